//! Signal keys, definitions and the signal registry.
//!
//! A signal is a scalar physiological quantity (hormone, neurotransmitter
//! tone, metabolite, autonomic marker) that relaxes toward a circadian
//! setpoint, is forced by interventions and other signals, and is cleared at
//! a rate scaled by transporters, enzymes and couplings.

pub mod auxiliary;
pub mod circadian;
pub mod dynamics;
pub mod keys;
pub mod registry;

pub use auxiliary::{AuxiliaryDefinition, AuxiliaryDynamics, AuxiliaryKey, VesicleKey};
pub use circadian::{sigmoid, CyclePulse, Pulse, Setpoint, SetpointContext, SexScale, MINUTES_PER_DAY};
pub use dynamics::{Coupling, CouplingEffect, IdealTendency, Rectify, SignalDefinition, SignalDynamics};
pub use keys::SignalKey;
pub use registry::SignalRegistry;
