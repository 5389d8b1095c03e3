//! Immutable per-signal time series produced by a run.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::signals::SignalKey;

use super::grid::SimulationGrid;

/// A shared, immutable series of values on the simulation grid.
///
/// Cloning is cheap; snapshots can be handed to readers on other threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Arc<[f64]>,
}

impl Series {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values: values.into() }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at index; 0.0 when out of range.
    pub fn value_at(&self, index: usize) -> f64 {
        self.values.get(index).copied().unwrap_or(0.0)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Index and value of the maximum (first occurrence).
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b >= v => best,
                _ => Some((i, v)),
            })
    }

    /// Index and value of the minimum (first occurrence).
    pub fn trough(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (i, v)| match best {
                Some((_, b)) if b <= v => best,
                _ => Some((i, v)),
            })
    }

    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

/// One series per signal key, all on the same grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot {
    pub generation: u64,
    pub grid: SimulationGrid,
    series: BTreeMap<SignalKey, Series>,
}

impl SeriesSnapshot {
    pub fn new(generation: u64, grid: SimulationGrid, series: BTreeMap<SignalKey, Series>) -> Self {
        Self {
            generation,
            grid,
            series,
        }
    }

    /// Snapshot with an empty series for every key.
    pub fn empty(generation: u64, grid: SimulationGrid) -> Self {
        let series = SignalKey::ALL.iter().map(|&k| (k, Series::empty())).collect();
        Self::new(generation, grid, series)
    }

    pub fn get(&self, key: SignalKey) -> Option<&Series> {
        self.series.get(&key)
    }

    /// Value of `key` at grid index; 0.0 when the key or index is missing.
    pub fn value_at(&self, key: SignalKey, index: usize) -> f64 {
        self.series.get(&key).map(|s| s.value_at(index)).unwrap_or(0.0)
    }

    /// Value of `key` at the grid point nearest a playhead (minutes since origin).
    pub fn sample(&self, key: SignalKey, playhead_min: f64) -> f64 {
        self.value_at(key, self.grid.index_at(playhead_min))
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.series.values().map(Series::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> impl Iterator<Item = SignalKey> + '_ {
        self.series.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalKey, &Series)> {
        self.series.iter().map(|(k, s)| (*k, s))
    }

    /// Plain columns, for serialization.
    pub fn to_columns(&self) -> BTreeMap<SignalKey, Vec<f64>> {
        self.series.iter().map(|(k, s)| (*k, s.as_slice().to_vec())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_at_out_of_range_is_zero() {
        let series = Series::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(series.value_at(2), 3.0);
        assert_eq!(series.value_at(3), 0.0);
        assert_eq!(Series::empty().value_at(0), 0.0);
    }

    #[test]
    fn test_peak_and_trough() {
        let series = Series::new(vec![1.0, 5.0, 5.0, -2.0]);
        assert_eq!(series.peak(), Some((1, 5.0)));
        assert_eq!(series.trough(), Some((3, -2.0)));
        assert_eq!(Series::empty().peak(), None);
    }

    #[test]
    fn test_empty_snapshot_has_every_key() {
        let snapshot = SeriesSnapshot::empty(3, SimulationGrid::default());
        assert_eq!(snapshot.keys().count(), SignalKey::COUNT);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.sample(SignalKey::Cortisol, 480.0), 0.0);
    }
}
