//! Physio Simulator - physiological signal simulation engine
//!
//! This library integrates circadian baselines, interventions (food,
//! activity, drugs) and cross-signal couplings to produce a day's
//! trajectory of hormones, neurotransmitters and metabolic markers, plus
//! derived meters, organ scores and autonomic arousal.

// Allow non-snake-case for unit suffixes in field names (mg_per_L, L_per_kg, etc.)
// This follows the project convention of including units in names.
#![allow(non_snake_case)]

pub mod conditions;
pub mod config;
pub mod error;
pub mod export;
pub mod interventions;
pub mod pharmacology;
pub mod projections;
pub mod signals;
pub mod simulation;
pub mod state;

pub use conditions::{ConditionModel, ConditionRegistry, DynamicsAdjustments};
pub use config::{DebugToggles, EngineParameters, IntegratorParameters, Toggle};
pub use error::{ConfigurationError, WorkerClosed};
pub use export::{CsvExporter, ScenarioSnapshot};
pub use interventions::{InterventionCatalog, InterventionDefinition, TimelineItem};
pub use pharmacology::{TargetHandle, TargetRegistry};
pub use projections::{
    ArousalProjection, AutonomicState, CompositeDefinition, DerivedMetrics, DisplayRange, Nonlinearity,
    ProjectionCatalog, SignalStatus,
};
pub use signals::{SignalDefinition, SignalKey, SignalRegistry};
pub use simulation::{
    GenerationCounter, Series, SeriesSnapshot, Sex, SimulationEngine, SimulationGrid, SimulationOptions,
    SimulationRequest, SimulationResponse, SimulationWorker, Subject,
};
