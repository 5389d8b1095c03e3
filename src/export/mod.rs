//! Export and persistence helpers.
//!
//! Provides CSV time-series export, JSON series export and scenario
//! snapshots.

mod csv_export;
mod json_export;
mod scenario;

pub use csv_export::CsvExporter;
pub use json_export::{export_snapshot_json, export_snapshot_json_to, load_snapshot_json, SeriesExport};
pub use scenario::ScenarioSnapshot;
