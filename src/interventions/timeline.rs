//! Timeline items: scheduled interventions with timestamps.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

fn default_intensity() -> f64 {
    1.0
}

/// One scheduled intervention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineItem {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub intervention_key: String,
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Multiplies the dose or activity level
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

impl TimelineItem {
    pub fn new(id: &str, intervention_key: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.to_string(),
            start,
            end,
            intervention_key: intervention_key.to_string(),
            params: BTreeMap::new(),
            intensity: 1.0,
        }
    }

    /// Item placed at minute offsets from `origin`.
    pub fn at_minutes(
        id: &str,
        intervention_key: &str,
        origin: NaiveDateTime,
        start_min: f64,
        duration_min: f64,
    ) -> Self {
        let start = origin + Duration::milliseconds((start_min * 60_000.0).round() as i64);
        let end = start + Duration::milliseconds((duration_min.max(0.0) * 60_000.0).round() as i64);
        Self::new(id, intervention_key, start, end)
    }

    pub fn with_param(mut self, key: &str, value: f64) -> Self {
        self.params.insert(key.to_string(), value);
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    /// Duration in minutes, zero if `end` precedes `start`.
    pub fn duration_min(&self) -> f64 {
        ((self.end - self.start).num_milliseconds() as f64 / 60_000.0).max(0.0)
    }
}
