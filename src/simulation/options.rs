//! Per-request options and run diagnostics.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::DebugToggles;
use crate::signals::SignalKey;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationOptions {
    pub toggles: DebugToggles,
    /// Return auxiliary (density, activity, vesicle) series
    pub include_auxiliaries: bool,
    /// Return the intervention-driven production term per signal
    pub record_production: bool,
}

impl SimulationOptions {
    pub fn with_toggles(toggles: DebugToggles) -> Self {
        Self {
            toggles,
            ..Self::default()
        }
    }
}

/// What the engine had to repair or skip during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationDiagnostics {
    pub steps: usize,
    /// Steps per signal where dynamics produced a non-finite value and the
    /// neutral fallback was used instead
    pub failed_evaluations: BTreeMap<SignalKey, usize>,
    /// State entries reset after turning non-finite
    pub repaired_values: usize,
    /// Steps where forcing exceeded the cap and was clamped
    pub clamped_forcing: usize,
    /// Timeline items whose intervention key is unknown
    pub skipped_items: Vec<String>,
    pub unknown_conditions: Vec<String>,
    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl SimulationDiagnostics {
    pub fn is_clean(&self) -> bool {
        self.failed_evaluations.is_empty()
            && self.repaired_values == 0
            && self.clamped_forcing == 0
            && self.skipped_items.is_empty()
            && self.unknown_conditions.is_empty()
    }

    pub fn total_failures(&self) -> usize {
        self.failed_evaluations.values().sum()
    }
}
