//! Weighted composites of signal series.
//!
//! A composite is a validated weight map over signals. Computing it is one
//! full pass over a snapshot:
//!
//! raw[i] = bias + Σ weight[s] · series[s][i] / scale[s]
//!
//! reshaped by an optional nonlinearity and clamped to a display range.
//! Plain composites have unit scales and zero bias, so the raw value is the
//! weighted sum itself. Relative composites scale each signal by its tonic
//! level and subtract the weight sum, so a signal sitting at tonic
//! contributes nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::signals::{sigmoid, SignalKey, SignalRegistry};
use crate::simulation::{Series, SeriesSnapshot, SimulationGrid};

/// Output shaping applied to the raw weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nonlinearity {
    #[default]
    Linear,
    Sigmoid,
    Softplus,
    Relu,
    Tanh,
}

impl Nonlinearity {
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Nonlinearity::Linear => x,
            Nonlinearity::Sigmoid => sigmoid(x),
            // ln(1 + e^x) without overflow for large x
            Nonlinearity::Softplus => x.max(0.0) + (-x.abs()).exp().ln_1p(),
            Nonlinearity::Relu => x.max(0.0),
            Nonlinearity::Tanh => x.tanh(),
        }
    }
}

/// Bounded display range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayRange {
    pub min: f64,
    pub max: f64,
}

impl DisplayRange {
    pub const METER: DisplayRange = DisplayRange { min: 0.0, max: 1.2 };
    pub const ORGAN: DisplayRange = DisplayRange { min: -1.0, max: 1.2 };

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_finite() {
            value.clamp(self.min, self.max)
        } else {
            0.0_f64.clamp(self.min, self.max)
        }
    }
}

/// One weighted signal in a composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeTerm {
    pub signal: SignalKey,
    pub weight: f64,
    /// Divisor applied to the series before weighting
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeDefinition {
    pub key: String,
    pub label: String,
    terms: Vec<CompositeTerm>,
    pub bias: f64,
    pub nonlinearity: Nonlinearity,
    pub range: DisplayRange,
}

impl CompositeDefinition {
    /// Composite over raw series values.
    pub fn new(
        key: &str,
        label: &str,
        weights: &[(SignalKey, f64)],
        nonlinearity: Nonlinearity,
        range: DisplayRange,
    ) -> Result<Self, ConfigurationError> {
        let terms = weights
            .iter()
            .map(|&(signal, weight)| CompositeTerm {
                signal,
                weight,
                scale: 1.0,
            })
            .collect();
        Self::from_terms(key, label, terms, 0.0, nonlinearity, range)
    }

    /// Composite over deviations from each signal's tonic level.
    pub fn relative(
        key: &str,
        label: &str,
        weights: &[(SignalKey, f64)],
        nonlinearity: Nonlinearity,
        range: DisplayRange,
        registry: &SignalRegistry,
    ) -> Result<Self, ConfigurationError> {
        let mut terms = Vec::with_capacity(weights.len());
        for &(signal, weight) in weights {
            let tonic = registry.definition(signal).tonic();
            if !(tonic.is_finite() && tonic != 0.0) {
                return Err(ConfigurationError::InvalidComposite {
                    composite: key.to_string(),
                    reason: format!("signal '{}' has no tonic level to scale by", signal),
                });
            }
            terms.push(CompositeTerm {
                signal,
                weight,
                scale: tonic,
            });
        }
        let bias = -weights.iter().map(|&(_, w)| w).sum::<f64>();
        Self::from_terms(key, label, terms, bias, nonlinearity, range)
    }

    fn from_terms(
        key: &str,
        label: &str,
        terms: Vec<CompositeTerm>,
        bias: f64,
        nonlinearity: Nonlinearity,
        range: DisplayRange,
    ) -> Result<Self, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidComposite {
            composite: key.to_string(),
            reason,
        };
        if key.is_empty() {
            return Err(invalid("empty key".to_string()));
        }
        if terms.is_empty() {
            return Err(invalid("no weights".to_string()));
        }
        let mut seen = BTreeSet::new();
        for term in &terms {
            if !term.weight.is_finite() {
                return Err(invalid(format!("weight for '{}' is not finite", term.signal)));
            }
            if !seen.insert(term.signal) {
                return Err(invalid(format!("duplicate weight for '{}'", term.signal)));
            }
        }
        if !bias.is_finite() {
            return Err(invalid("bias is not finite".to_string()));
        }
        if !(range.min.is_finite() && range.max.is_finite() && range.min < range.max) {
            return Err(invalid(format!("display range [{}, {}] is empty", range.min, range.max)));
        }
        Ok(Self {
            key: key.to_string(),
            label: label.to_string(),
            terms,
            bias,
            nonlinearity,
            range,
        })
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        if bias.is_finite() {
            self.bias = bias;
        }
        self
    }

    pub fn terms(&self) -> &[CompositeTerm] {
        &self.terms
    }

    /// Weighted sum before shaping and clamping.
    pub fn raw_at(&self, snapshot: &SeriesSnapshot, index: usize) -> f64 {
        self.terms
            .iter()
            .fold(self.bias, |acc, t| acc + t.weight * snapshot.value_at(t.signal, index) / t.scale)
    }

    /// Shaped and clamped value at one grid index.
    pub fn value_at(&self, snapshot: &SeriesSnapshot, index: usize) -> f64 {
        self.range.clamp(self.nonlinearity.apply(self.raw_at(snapshot, index)))
    }

    /// Full pass over a snapshot.
    pub fn compute(&self, snapshot: &SeriesSnapshot) -> CompositeSeries {
        let values: Vec<f64> = (0..snapshot.len()).map(|i| self.value_at(snapshot, i)).collect();
        CompositeSeries {
            key: self.key.clone(),
            grid: snapshot.grid.clone(),
            series: Series::new(values),
        }
    }

    /// Top `n` signals by absolute weight; ties keep signal order.
    pub fn explain(&self, n: usize) -> Vec<(SignalKey, f64)> {
        let mut ranked: Vec<(SignalKey, f64)> = self.terms.iter().map(|t| (t.signal, t.weight)).collect();
        ranked.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }
}

/// A composite evaluated over a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSeries {
    pub key: String,
    pub grid: SimulationGrid,
    pub series: Series,
}

impl CompositeSeries {
    pub fn value_at(&self, index: usize) -> f64 {
        self.series.value_at(index)
    }

    /// Value at the grid point nearest a playhead; 0.0 when empty.
    pub fn sample(&self, playhead_min: f64) -> f64 {
        if self.series.is_empty() {
            return 0.0;
        }
        self.series.value_at(self.grid.index_at(playhead_min))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn snapshot(values: &[(SignalKey, Vec<f64>)]) -> SeriesSnapshot {
        let len = values.first().map(|(_, v)| v.len()).unwrap_or(0);
        let grid = SimulationGrid::new(SimulationGrid::default().origin, 0.0, 5.0, len);
        let series: BTreeMap<SignalKey, Series> =
            values.iter().map(|(k, v)| (*k, Series::new(v.clone()))).collect();
        SeriesSnapshot::new(1, grid, series)
    }

    #[test]
    fn test_rejects_invalid_definitions() {
        let range = DisplayRange::METER;
        assert!(CompositeDefinition::new("x", "X", &[], Nonlinearity::Linear, range).is_err());
        assert!(CompositeDefinition::new("x", "X", &[(SignalKey::Insulin, f64::NAN)], Nonlinearity::Linear, range).is_err());
        assert!(CompositeDefinition::new(
            "x",
            "X",
            &[(SignalKey::Insulin, 1.0), (SignalKey::Insulin, 2.0)],
            Nonlinearity::Linear,
            range
        )
        .is_err());
        let empty_range = DisplayRange { min: 1.0, max: 1.0 };
        assert!(CompositeDefinition::new("x", "X", &[(SignalKey::Insulin, 1.0)], Nonlinearity::Linear, empty_range).is_err());
    }

    #[test]
    fn test_weighted_sum_clamped() {
        let def = CompositeDefinition::new(
            "pancreas",
            "Pancreas",
            &[(SignalKey::Insulin, 0.8)],
            Nonlinearity::Linear,
            DisplayRange::ORGAN,
        )
        .unwrap();
        let snap = snapshot(&[(SignalKey::Insulin, vec![0.5, 1.0, 2.0, -3.0])]);
        let out = def.compute(&snap);
        assert_eq!(out.series.as_slice(), &[0.4, 0.8, 1.2, -1.0]);
    }

    #[test]
    fn test_missing_series_reads_zero() {
        let def = CompositeDefinition::new(
            "x",
            "X",
            &[(SignalKey::Insulin, 1.0), (SignalKey::Glucose, 1.0)],
            Nonlinearity::Linear,
            DisplayRange::ORGAN,
        )
        .unwrap();
        let snap = snapshot(&[(SignalKey::Insulin, vec![0.25, 0.5])]);
        assert_eq!(def.compute(&snap).series.as_slice(), &[0.25, 0.5]);
    }

    #[test]
    fn test_nonlinearities() {
        assert_eq!(Nonlinearity::Relu.apply(-2.0), 0.0);
        assert!((Nonlinearity::Sigmoid.apply(0.0) - 0.5).abs() < 1e-12);
        assert!((Nonlinearity::Softplus.apply(0.0) - 2f64.ln()).abs() < 1e-12);
        assert!((Nonlinearity::Softplus.apply(800.0) - 800.0).abs() < 1e-9);
        assert!((Nonlinearity::Tanh.apply(0.5) - 0.5f64.tanh()).abs() < 1e-12);
    }

    #[test]
    fn test_explain_orders_by_magnitude() {
        let def = CompositeDefinition::new(
            "calm",
            "Calm",
            &[
                (SignalKey::Cortisol, -0.3),
                (SignalKey::Gaba, 0.5),
                (SignalKey::Serotonin, 0.3),
            ],
            Nonlinearity::Sigmoid,
            DisplayRange::METER,
        )
        .unwrap();
        let top = def.explain(2);
        assert_eq!(top, vec![(SignalKey::Gaba, 0.5), (SignalKey::Cortisol, -0.3)]);
        assert_eq!(def.explain(10).len(), 3);
    }

    #[test]
    fn test_empty_snapshot_samples_zero() {
        let def = CompositeDefinition::new("x", "X", &[(SignalKey::Insulin, 1.0)], Nonlinearity::Linear, DisplayRange::ORGAN)
            .unwrap();
        let out = def.compute(&SeriesSnapshot::empty(0, SimulationGrid::default()));
        assert!(out.is_empty());
        assert_eq!(out.sample(480.0), 0.0);
        assert_eq!(out.value_at(5), 0.0);
    }
}
