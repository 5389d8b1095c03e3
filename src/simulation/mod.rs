//! Simulation core: grid, subject, integrator, engine and worker.

pub mod engine;
pub mod grid;
pub mod integrator;
pub mod options;
pub mod series;
pub mod subject;
pub mod worker;

pub use engine::{SimulationEngine, SimulationRequest, SimulationResponse};
pub use grid::{SimulationGrid, MAX_GRID_POINTS, MINUTES_PER_DAY};
pub use integrator::{relax_toward, relaxation_step, IntegratorConfig, RK4Integrator, StepOutcome};
pub use options::{SimulationDiagnostics, SimulationOptions};
pub use series::{Series, SeriesSnapshot};
pub use subject::{ConditionSpec, MenstrualCycle, Sex, Subject};
pub use worker::{GenerationCounter, SimulationWorker};
