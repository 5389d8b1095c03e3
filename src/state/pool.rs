//! Flat state vector for one time point.

use super::layout::StateLayout;
use crate::signals::{AuxiliaryKey, SignalKey};

/// Signal and auxiliary values at one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePool {
    values: Vec<f64>,
}

impl StatePool {
    /// Create a zeroed pool sized for `layout`
    pub fn new(layout: &StateLayout) -> Self {
        Self {
            values: vec![0.0; layout.total_count()],
        }
    }

    /// Get value at index
    #[inline]
    pub fn get(&self, idx: usize) -> f64 {
        self.values.get(idx).copied().unwrap_or(0.0)
    }

    /// Set value at index
    #[inline]
    pub fn set(&mut self, idx: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(idx) {
            *slot = value;
        }
    }

    #[inline]
    pub fn signal(&self, key: SignalKey) -> f64 {
        self.get(key.index())
    }

    #[inline]
    pub fn set_signal(&mut self, key: SignalKey, value: f64) {
        self.set(key.index(), value);
    }

    /// Auxiliary value; 1.0 (unperturbed) when the layout has no such auxiliary
    #[inline]
    pub fn auxiliary(&self, layout: &StateLayout, key: AuxiliaryKey) -> f64 {
        layout.auxiliary(key).map(|idx| self.get(idx)).unwrap_or(1.0)
    }

    #[inline]
    pub fn set_auxiliary(&mut self, layout: &StateLayout, key: AuxiliaryKey, value: f64) {
        if let Some(idx) = layout.auxiliary(key) {
            self.set(idx, value);
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count and repair non-finite entries, replacing them with `fallback(idx)`.
    pub fn repair_non_finite<F>(&mut self, fallback: F) -> usize
    where
        F: Fn(usize) -> f64,
    {
        let mut repaired = 0;
        for (idx, value) in self.values.iter_mut().enumerate() {
            if !value.is_finite() {
                *value = fallback(idx);
                repaired += 1;
            }
        }
        repaired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharmacology::ReceptorKey;
    use crate::signals::VesicleKey;

    fn layout() -> StateLayout {
        StateLayout::new([
            AuxiliaryKey::VesiclePool(VesicleKey::Dopamine),
            AuxiliaryKey::ReceptorDensity(ReceptorKey::A1),
        ])
    }

    #[test]
    fn test_layout_places_auxiliaries_after_signals() {
        let layout = layout();
        assert_eq!(layout.total_count(), SignalKey::COUNT + 2);
        // Sorted: receptor densities before vesicle pools
        assert_eq!(
            layout.auxiliary(AuxiliaryKey::ReceptorDensity(ReceptorKey::A1)),
            Some(SignalKey::COUNT)
        );
        assert_eq!(
            layout.auxiliary(AuxiliaryKey::VesiclePool(VesicleKey::Dopamine)),
            Some(SignalKey::COUNT + 1)
        );
    }

    #[test]
    fn test_pool_access() {
        let layout = layout();
        let mut pool = StatePool::new(&layout);
        pool.set_signal(SignalKey::Glucose, 90.0);
        assert_eq!(pool.signal(SignalKey::Glucose), 90.0);
        assert_eq!(pool.get(10_000), 0.0);

        let key = AuxiliaryKey::VesiclePool(VesicleKey::Dopamine);
        pool.set_auxiliary(&layout, key, 0.7);
        assert_eq!(pool.auxiliary(&layout, key), 0.7);
        let missing = AuxiliaryKey::ReceptorDensity(ReceptorKey::H1);
        assert_eq!(pool.auxiliary(&layout, missing), 1.0);
    }

    #[test]
    fn test_repair_non_finite() {
        let layout = layout();
        let mut pool = StatePool::new(&layout);
        pool.set_signal(SignalKey::Cortisol, f64::NAN);
        pool.set_signal(SignalKey::Insulin, f64::INFINITY);
        let repaired = pool.repair_non_finite(|_| 5.0);
        assert_eq!(repaired, 2);
        assert_eq!(pool.signal(SignalKey::Cortisol), 5.0);
    }
}
