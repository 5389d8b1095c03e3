//! Derived metric projections: meters, organ scores and autonomic arousal.
//!
//! All projections are pure functions of a series snapshot and a static
//! weight map. They never fail at evaluation time: missing or empty series
//! read as zero.

pub mod arousal;
pub mod catalog;
pub mod composite;
pub mod status;

pub use arousal::{ArousalProjection, ArousalSeries, AutonomicState, DORSAL_THRESHOLD, MOBILIZED_THRESHOLD};
pub use catalog::{DerivedMetrics, ProjectionCatalog};
pub use composite::{CompositeDefinition, CompositeSeries, CompositeTerm, DisplayRange, Nonlinearity};
pub use status::SignalStatus;
