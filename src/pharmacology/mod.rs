//! Pharmacology: targets, pharmacokinetics and pharmacodynamics.

pub mod pd;
pub mod pk;
pub mod targets;

pub use pd::{
    effect_site_curve, hill_fraction, DirectEffect, DirectKind, Mechanism, PdEffect, PdSpec, Potency,
};
pub use pk::{PkModel, PkSpec, VolumeOfDistribution};
pub use targets::{
    Adaptation, ClearanceRoute, EndogenousLigand, EnzymeDefinition, EnzymeKey, ReceptorCoupling, ReceptorDefinition,
    ReceptorKey, TargetHandle, TargetRegistry, TransporterDefinition, TransporterKey,
};
