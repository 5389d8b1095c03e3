//! JSON export of computed series.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::signals::SignalKey;
use crate::simulation::{SeriesSnapshot, SimulationGrid};

/// Full series export structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesExport {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: String,
    pub generation: u64,
    pub grid: SimulationGrid,
    pub series: BTreeMap<SignalKey, Vec<f64>>,
}

impl SeriesExport {
    pub fn new(snapshot: &SeriesSnapshot) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generation: snapshot.generation,
            grid: snapshot.grid.clone(),
            series: snapshot.to_columns(),
        }
    }

    /// Rebuild a snapshot from the exported columns.
    pub fn into_snapshot(self) -> SeriesSnapshot {
        let series = self.series.into_iter().map(|(k, v)| (k, v.into())).collect();
        SeriesSnapshot::new(self.generation, self.grid, series)
    }
}

/// Export a snapshot to JSON
///
/// Creates the exports directory if it doesn't exist.
/// Filename is auto-generated with timestamp: `series_YYYYMMDD_HHMMSS.json`
///
/// Returns the path to the saved JSON file.
pub fn export_snapshot_json(snapshot: &SeriesSnapshot) -> Result<PathBuf> {
    let dir = PathBuf::from("exports");
    std::fs::create_dir_all(&dir)?;

    let timestamp = Local::now();
    let filename = format!("series_{}.json", timestamp.format("%Y%m%d_%H%M%S"));
    let path = dir.join(&filename);

    export_snapshot_json_to(snapshot, &path)?;
    Ok(path)
}

/// Export a snapshot to a specific file
pub fn export_snapshot_json_to(snapshot: &SeriesSnapshot, path: &Path) -> Result<()> {
    let export = SeriesExport::new(snapshot);

    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("JSON series exported: {}", path.display());
    Ok(())
}

/// Read a previously exported snapshot
pub fn load_snapshot_json(path: &Path) -> Result<SeriesSnapshot> {
    let file = std::fs::File::open(path)?;
    let export: SeriesExport = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(export.into_snapshot())
}
