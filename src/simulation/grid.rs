//! The uniform time grid a run is evaluated on.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
pub use crate::signals::MINUTES_PER_DAY;

/// Largest grid a run will allocate: two years at one-minute resolution.
pub const MAX_GRID_POINTS: usize = 2 * 366 * 1440;

/// Uniform grid of `len` points `step_min` apart, starting `start_min`
/// minutes after `origin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationGrid {
    /// Calendar time of minute zero (midnight of the first simulated day)
    pub origin: NaiveDateTime,
    pub start_min: f64,
    pub step_min: f64,
    pub len: usize,
}

impl SimulationGrid {
    pub fn new(origin: NaiveDateTime, start_min: f64, step_min: f64, len: usize) -> Self {
        Self {
            origin,
            start_min,
            step_min,
            len,
        }
    }

    /// Whole days from midnight of `origin`, end exclusive.
    ///
    /// The step must be positive and leave at most [`MAX_GRID_POINTS`] points.
    pub fn days(origin: NaiveDateTime, step_min: f64, days: u32) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidParameter {
            intervention: "grid".to_string(),
            param: "gridStepMin".to_string(),
            reason,
        };
        if !(step_min.is_finite() && step_min > 0.0) {
            return Err(invalid(format!("step {} min must be positive", step_min)));
        }
        let points = (f64::from(days) * MINUTES_PER_DAY / step_min).round();
        if points > MAX_GRID_POINTS as f64 {
            return Err(invalid(format!(
                "step {} min over {} days gives {} points (limit {})",
                step_min, days, points, MAX_GRID_POINTS
            )));
        }
        Ok(Self::new(origin, 0.0, step_min, points as usize))
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Minutes since origin at grid index `i`.
    pub fn time_at(&self, i: usize) -> f64 {
        self.start_min + i as f64 * self.step_min
    }

    /// Clock minute in [0, 1440) at grid index `i`.
    pub fn minute_of_day(&self, i: usize) -> f64 {
        self.time_at(i).rem_euclid(MINUTES_PER_DAY)
    }

    /// Minutes from origin to a calendar time.
    pub fn minutes_since_origin(&self, at: NaiveDateTime) -> f64 {
        (at - self.origin).num_milliseconds() as f64 / 60_000.0
    }

    /// Nearest grid index to a playhead (minutes since origin), clamped to
    /// the grid. Empty grids and non-finite playheads give 0.
    pub fn index_at(&self, playhead_min: f64) -> usize {
        if self.len == 0 || !playhead_min.is_finite() || !(self.step_min > 0.0) {
            return 0;
        }
        let raw = ((playhead_min - self.start_min) / self.step_min).round();
        raw.clamp(0.0, (self.len - 1) as f64) as usize
    }

}

impl Default for SimulationGrid {
    fn default() -> Self {
        Self::new(NaiveDateTime::default(), 0.0, 5.0, 288)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_grid() {
        let grid = SimulationGrid::default();
        assert_eq!(grid.len, 288);
        assert_eq!(grid.time_at(0), 0.0);
        assert_eq!(grid.time_at(287), 1435.0);
    }

    #[test]
    fn test_index_at_clamps_and_rounds() {
        let grid = SimulationGrid::default();
        assert_eq!(grid.index_at(-100.0), 0);
        assert_eq!(grid.index_at(12.4), 2);
        assert_eq!(grid.index_at(12.6), 3);
        assert_eq!(grid.index_at(1e9), 287);
        assert_eq!(grid.index_at(f64::NAN), 0);
        assert_eq!(grid.index_at(f64::INFINITY), 0);

        let empty = SimulationGrid::new(NaiveDateTime::default(), 0.0, 5.0, 0);
        assert_eq!(empty.index_at(100.0), 0);
    }

    #[test]
    fn test_multi_day_minute_of_day_wraps() {
        let grid = SimulationGrid::days(NaiveDateTime::default(), 60.0, 2).unwrap();
        assert_eq!(grid.len, 48);
        assert_eq!(grid.minute_of_day(25), 60.0);
    }

    #[test]
    fn test_default_is_one_day_at_five_minutes() {
        assert_eq!(SimulationGrid::days(NaiveDateTime::default(), 5.0, 1).unwrap(), SimulationGrid::default());
    }

    #[test]
    fn test_degenerate_steps_rejected() {
        let origin = NaiveDateTime::default();
        for step in [0.0, -5.0, f64::NAN, f64::INFINITY, 1e-9] {
            let result = SimulationGrid::days(origin, step, 1);
            assert!(
                matches!(result, Err(ConfigurationError::InvalidParameter { ref param, .. }) if param == "gridStepMin"),
                "step {} accepted: {:?}",
                step,
                result
            );
        }
        // Exactly at the limit is fine
        let full = SimulationGrid::days(origin, 1.0, 2 * 366).unwrap();
        assert_eq!(full.len, MAX_GRID_POINTS);
    }
}
