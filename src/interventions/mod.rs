//! Interventions: the catalog of things a user can schedule, and their
//! resolution into exposure on the simulation grid.

pub mod builtin;
pub mod catalog;
pub mod exposure;
pub mod params;
pub mod timeline;

pub use catalog::{
    DoseRule, GastricDelay, InterventionCatalog, InterventionDefinition, InterventionSpec, MoleculeProfile,
    NutrientEffect, NutritionSpec, PharmacologyProfile, PharmacologySpec, Profile, ProfileSpec,
};
pub use exposure::{resolve_timeline, DirectTerm, PdTerm, ResolvedExposure};
pub use params::{resolve_params, ParamDef};
pub use timeline::TimelineItem;
