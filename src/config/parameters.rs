//! Engine parameters: numerical guards, default grid and default subject.
//!
//! Loaded from JSON when present; every field falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::Subject;

/// Top-level parameters container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    pub integrator: IntegratorParameters,
    pub grid: GridParameters,
    pub subject: Subject,
}

impl EngineParameters {
    /// Load parameters from the default location, or use defaults
    pub fn load_or_default() -> Self {
        Self::load_from("data/parameters/engine.json")
    }

    /// Load from a JSON file or return defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(params) => {
                    log::info!("Loaded engine parameters from {:?}", path.as_ref());
                    params.sanitized()
                }
                Err(e) => {
                    log::warn!("Failed to parse engine parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Engine parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Replace out-of-range numerical guards with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = IntegratorParameters::default();
        let i = &mut self.integrator;
        if !(i.tau_floor_min.is_finite() && i.tau_floor_min > 0.0) {
            log::warn!("tau_floor_min {} invalid, using {}", i.tau_floor_min, defaults.tau_floor_min);
            i.tau_floor_min = defaults.tau_floor_min;
        }
        if !(i.clearance_floor > 0.0 && i.clearance_ceiling > i.clearance_floor && i.clearance_ceiling.is_finite()) {
            log::warn!("Clearance bounds invalid, using defaults");
            i.clearance_floor = defaults.clearance_floor;
            i.clearance_ceiling = defaults.clearance_ceiling;
        }
        if !(i.max_forcing_per_min.is_finite() && i.max_forcing_per_min > 0.0) {
            i.max_forcing_per_min = defaults.max_forcing_per_min;
        }
        if i.pk_substeps == 0 {
            i.pk_substeps = defaults.pk_substeps;
        }
        if !(self.grid.step_min.is_finite() && self.grid.step_min > 0.0) {
            log::warn!("Grid step {} invalid, using default", self.grid.step_min);
            self.grid.step_min = GridParameters::default().step_min;
        }
        self
    }
}

/// Numerical guards for the stepping loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorParameters {
    /// Lower bound on effective relaxation time (minutes)
    pub tau_floor_min: f64,
    /// Bounds on the combined clearance multiplier
    pub clearance_floor: f64,
    pub clearance_ceiling: f64,
    /// Forcing magnitude cap (signal units per minute)
    pub max_forcing_per_min: f64,
    /// RK4 sub-steps per grid step for saturable PK
    pub pk_substeps: u32,
}

impl Default for IntegratorParameters {
    fn default() -> Self {
        Self {
            tau_floor_min: 0.05,
            clearance_floor: 0.05,
            clearance_ceiling: 20.0,
            max_forcing_per_min: 1.0e6,
            pk_substeps: 4,
        }
    }
}

/// Default time grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParameters {
    /// Grid spacing (minutes)
    pub step_min: f64,
    /// Simulated days
    pub days: u32,
}

impl Default for GridParameters {
    fn default() -> Self {
        Self { step_min: 5.0, days: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let params = EngineParameters::load_from("/nonexistent/engine.json");
        assert_eq!(params, EngineParameters::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let params: EngineParameters = serde_json::from_str(r#"{"grid": {"step_min": 1.0}}"#).unwrap();
        assert_eq!(params.grid.step_min, 1.0);
        assert_eq!(params.grid.days, 1);
        assert_eq!(params.integrator, IntegratorParameters::default());
    }

    #[test]
    fn test_sanitize_restores_invalid_guards() {
        let mut params = EngineParameters::default();
        params.integrator.clearance_floor = 5.0;
        params.integrator.clearance_ceiling = 1.0;
        params.integrator.pk_substeps = 0;
        params.grid.step_min = -1.0;
        let fixed = params.sanitized();
        assert_eq!(fixed.integrator, IntegratorParameters::default());
        assert_eq!(fixed.grid.step_min, 5.0);
    }
}
