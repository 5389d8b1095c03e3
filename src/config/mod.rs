//! Configuration: engine parameters and debug toggles.

mod parameters;
mod toggles;

pub use parameters::{EngineParameters, GridParameters, IntegratorParameters};
pub use toggles::{DebugToggles, Toggle};
