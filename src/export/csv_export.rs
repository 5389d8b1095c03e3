//! CSV time-series export for computed series.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Local;

use crate::projections::DerivedMetrics;
use crate::simulation::SeriesSnapshot;

/// CSV exporter: one row per grid point, a time column and one column per
/// signal.
pub struct CsvExporter<W: Write = File> {
    writer: csv::Writer<W>,
    /// Path to output file, when writing to disk
    path: Option<PathBuf>,
    rows: usize,
}

impl CsvExporter<File> {
    /// Create a new CSV exporter in the `exports` directory
    ///
    /// Creates the exports directory if it doesn't exist.
    /// Filename is auto-generated with timestamp.
    pub fn new() -> Result<Self> {
        let dir = PathBuf::from("exports");
        std::fs::create_dir_all(&dir)?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("series_{}.csv", timestamp);
        Self::create(&dir.join(filename))
    }

    /// Create a CSV exporter writing to `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        log::info!("CSV export started: {}", path.display());
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            path: Some(path.to_path_buf()),
            rows: 0,
        })
    }
}

impl<W: Write> CsvExporter<W> {
    /// CSV exporter over any writer
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            path: None,
            rows: 0,
        }
    }

    /// Write every signal of a snapshot
    pub fn write_snapshot(&mut self, snapshot: &SeriesSnapshot) -> Result<()> {
        self.write_snapshot_with(snapshot, None)
    }

    /// Write every signal of a snapshot followed by meter, organ and arousal
    /// columns
    pub fn write_snapshot_with(&mut self, snapshot: &SeriesSnapshot, metrics: Option<&DerivedMetrics>) -> Result<()> {
        let mut header = vec!["minute".to_string()];
        header.extend(snapshot.keys().map(|k| k.to_string()));
        if let Some(metrics) = metrics {
            header.extend(metrics.meters.keys().map(|k| format!("meter.{}", k)));
            header.extend(metrics.organs.keys().map(|k| format!("organ.{}", k)));
            header.extend(["arousal.sympathetic", "arousal.parasympathetic", "arousal.overall"].map(String::from));
        }
        self.writer.write_record(&header)?;

        for i in 0..snapshot.len() {
            let mut row = vec![format!("{}", snapshot.grid.time_at(i))];
            row.extend(snapshot.iter().map(|(_, s)| format!("{}", s.value_at(i))));
            if let Some(metrics) = metrics {
                row.extend(metrics.meters.values().map(|s| format!("{}", s.value_at(i))));
                row.extend(metrics.organs.values().map(|s| format!("{}", s.value_at(i))));
                row.push(format!("{}", metrics.arousal.sympathetic.value_at(i)));
                row.push(format!("{}", metrics.arousal.parasympathetic.value_at(i)));
                row.push(format!("{}", metrics.arousal.overall.value_at(i)));
            }
            self.writer.write_record(&row)?;
            self.rows += 1;
        }
        Ok(())
    }

    /// Data rows written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Finish writing and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("CSV writer flush failed: {}", e.error()))
    }

    /// Get the output path
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CsvExporter<File> {
    /// Finish writing and return the output path
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        let path = self.path.take().unwrap_or_default();
        log::info!("CSV export completed: {} ({} rows)", path.display(), self.rows);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::SignalKey;
    use crate::simulation::{Series, SimulationGrid};
    use std::collections::BTreeMap;

    #[test]
    fn test_snapshot_rows_and_header() {
        let grid = SimulationGrid::new(SimulationGrid::default().origin, 0.0, 5.0, 3);
        let mut series = BTreeMap::new();
        series.insert(SignalKey::Cortisol, Series::new(vec![1.0, 2.0, 3.0]));
        series.insert(SignalKey::Glucose, Series::new(vec![90.0, 91.0, 92.5]));
        let snapshot = SeriesSnapshot::new(1, grid, series);

        let mut exporter = CsvExporter::from_writer(Vec::new());
        exporter.write_snapshot(&snapshot).unwrap();
        assert_eq!(exporter.rows(), 3);
        let text = String::from_utf8(exporter.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "minute,cortisol,glucose");
        assert_eq!(lines[1], "0,1,90");
        assert_eq!(lines[3], "10,3,92.5");
    }
}
