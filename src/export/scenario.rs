//! Scenario snapshots: the persisted form of a user's day.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::interventions::TimelineItem;
use crate::simulation::{SimulationGrid, SimulationRequest, Subject};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSnapshot {
    pub name: String,
    pub grid_step_min: f64,
    #[serde(default)]
    pub items: Vec<TimelineItem>,
    #[serde(default)]
    pub personal: Subject,
    #[serde(default)]
    pub notes: String,
}

impl ScenarioSnapshot {
    pub fn new(name: &str, grid_step_min: f64) -> Self {
        Self {
            name: name.to_string(),
            grid_step_min,
            items: Vec::new(),
            personal: Subject::default(),
            notes: String::new(),
        }
    }

    pub fn with_item(mut self, item: TimelineItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.personal = subject;
        self
    }

    /// Load a scenario from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: ScenarioSnapshot =
            serde_json::from_str(&contents).with_context(|| format!("parsing scenario {}", path.display()))?;
        log::info!("Loaded scenario '{}' with {} items", scenario.name, scenario.items.len());
        Ok(scenario)
    }

    /// Save as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        log::info!("Scenario '{}' saved: {}", self.name, path.display());
        Ok(())
    }

    /// Grid origin: midnight of the earliest item, or the epoch for an
    /// empty scenario.
    pub fn origin(&self) -> NaiveDateTime {
        self.items
            .iter()
            .map(|item| item.start)
            .min()
            .and_then(|start| start.date().and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    /// Engine request covering `days` days from the scenario origin. Fails
    /// when the scenario's grid step cannot produce a sane grid.
    pub fn to_request(&self, days: u32) -> Result<SimulationRequest, ConfigurationError> {
        let grid = SimulationGrid::days(self.origin(), self.grid_step_min, days)?;
        Ok(SimulationRequest::new(grid, self.items.clone()).with_subject(self.personal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let origin = SimulationGrid::default().origin;
        let scenario = ScenarioSnapshot::new("demo", 5.0)
            .with_item(TimelineItem::at_minutes("a", "caffeine", origin, 480.0, 30.0).with_param("mg", 100.0));
        let json = serde_json::to_string(&scenario).unwrap();
        assert!(json.contains("\"gridStepMin\":5.0"), "{}", json);
        assert!(json.contains("\"personal\""), "{}", json);
        let back: ScenarioSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scenario);
    }

    #[test]
    fn test_origin_is_midnight_of_first_item() {
        let origin = SimulationGrid::default().origin;
        let scenario = ScenarioSnapshot::new("demo", 5.0)
            .with_item(TimelineItem::at_minutes("late", "food", origin, 1500.0, 20.0))
            .with_item(TimelineItem::at_minutes("early", "food", origin, 1450.0, 20.0));
        let expected = origin + chrono::Duration::days(1);
        assert_eq!(scenario.origin(), expected);
        assert_eq!(ScenarioSnapshot::new("empty", 5.0).origin(), NaiveDateTime::default());
    }
}
