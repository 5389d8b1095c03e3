//! Built-in meters, organ scores and arousal, and their evaluation over a
//! snapshot.
//!
//! Meters read 0.5 with every contributing signal at tonic and saturate
//! through a sigmoid. Organ scores read 0 at tonic and are linear.

use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::signals::{SignalKey, SignalRegistry};
use crate::simulation::SeriesSnapshot;

use super::arousal::{ArousalProjection, ArousalSeries, AutonomicState};
use super::composite::{CompositeDefinition, CompositeSeries, DisplayRange, Nonlinearity};

type Weights = &'static [(SignalKey, f64)];

const METERS: &[(&str, &str, Weights)] = {
    use SignalKey::*;
    &[
        (
            "energy",
            "Energy",
            &[(Orexin, 0.4), (Dopamine, 0.3), (Cortisol, 0.2), (Glucose, 0.1), (Adenosine, -0.4), (Melatonin, -0.02)],
        ),
        (
            "focus",
            "Focus",
            &[(Acetylcholine, 0.4), (Dopamine, 0.4), (Norepinephrine, 0.3), (Histamine, 0.2), (Adenosine, -0.3)],
        ),
        (
            "calm",
            "Calm",
            &[(Gaba, 0.5), (VagalTone, 0.4), (Serotonin, 0.3), (Cortisol, -0.3), (Norepinephrine, -0.2), (Adrenaline, -0.1)],
        ),
        (
            "mood",
            "Mood",
            &[(Serotonin, 0.5), (Dopamine, 0.4), (Endorphin, 0.3), (Bdnf, 0.2), (Cortisol, -0.2), (Il6, -0.2)],
        ),
        (
            "stress",
            "Stress",
            &[(Cortisol, 0.5), (Norepinephrine, 0.3), (Adrenaline, 0.2), (VagalTone, -0.3)],
        ),
        (
            "sleepPressure",
            "Sleep pressure",
            &[(Adenosine, 0.8), (Melatonin, 0.05), (Orexin, -0.3)],
        ),
        (
            "satiety",
            "Satiety",
            &[(Leptin, 0.3), (Insulin, 0.3), (Glucose, 0.3), (Ghrelin, -0.5)],
        ),
        (
            "recovery",
            "Recovery",
            &[(VagalTone, 0.5), (Bdnf, 0.2), (GrowthHormone, 0.1), (Il6, -0.3), (Cortisol, -0.2), (Lactate, -0.2)],
        ),
    ]
};

const ORGANS: &[(&str, &str, Weights)] = {
    use SignalKey::*;
    &[
        (
            "brain",
            "Brain",
            &[(Glutamate, 0.4), (Adenosine, 0.3), (Cortisol, 0.2), (Il6, 0.1), (Bdnf, -0.2)],
        ),
        ("heart", "Heart", &[(HeartRate, 0.6), (Adrenaline, 0.2), (VagalTone, -0.2)]),
        (
            "liver",
            "Liver",
            &[(Glucagon, 0.3), (Ketones, 0.3), (Lactate, 0.2), (Cortisol, 0.2)],
        ),
        ("pancreas", "Pancreas", &[(Insulin, 0.6), (Glucagon, 0.2), (Glucose, 0.2)]),
        (
            "muscle",
            "Muscle",
            &[(Lactate, 0.5), (Il6, 0.2), (GrowthHormone, 0.2), (Adrenaline, 0.1)],
        ),
        (
            "adrenals",
            "Adrenals",
            &[(Cortisol, 0.5), (Adrenaline, 0.3), (Norepinephrine, 0.2)],
        ),
        (
            "gut",
            "Gut",
            &[(Serotonin, 0.3), (Glucose, 0.3), (Insulin, 0.2), (Ghrelin, -0.2)],
        ),
    ]
};

/// Every composite the engine's consumers display.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionCatalog {
    pub meters: Vec<CompositeDefinition>,
    pub organs: Vec<CompositeDefinition>,
    pub arousal: ArousalProjection,
}

impl ProjectionCatalog {
    pub fn builtin(registry: &SignalRegistry) -> Result<Self, ConfigurationError> {
        let meters = METERS
            .iter()
            .map(|(key, label, weights)| {
                CompositeDefinition::relative(key, label, weights, Nonlinearity::Sigmoid, DisplayRange::METER, registry)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let organs = ORGANS
            .iter()
            .map(|(key, label, weights)| {
                CompositeDefinition::relative(key, label, weights, Nonlinearity::Linear, DisplayRange::ORGAN, registry)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let arousal = ArousalProjection::builtin(registry)?;
        Self::new(meters, organs, arousal)
    }

    /// Catalog from explicit definitions. Keys must be unique across all
    /// composites.
    pub fn new(
        meters: Vec<CompositeDefinition>,
        organs: Vec<CompositeDefinition>,
        arousal: ArousalProjection,
    ) -> Result<Self, ConfigurationError> {
        let catalog = Self {
            meters,
            organs,
            arousal,
        };
        let mut seen = std::collections::BTreeSet::new();
        for def in catalog.composites() {
            if !seen.insert(def.key.as_str()) {
                return Err(ConfigurationError::DuplicateKey(def.key.clone()));
            }
        }
        Ok(catalog)
    }

    /// All composites: meters, organs, then arousal components.
    pub fn composites(&self) -> impl Iterator<Item = &CompositeDefinition> {
        self.meters
            .iter()
            .chain(self.organs.iter())
            .chain([&self.arousal.sympathetic, &self.arousal.parasympathetic])
    }

    pub fn get(&self, key: &str) -> Option<&CompositeDefinition> {
        self.composites().find(|def| def.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.composites().map(|def| def.key.as_str()).collect()
    }

    /// Evaluate every composite over a snapshot.
    pub fn compute(&self, snapshot: &SeriesSnapshot) -> DerivedMetrics {
        DerivedMetrics {
            generation: snapshot.generation,
            meters: self.meters.iter().map(|d| (d.key.clone(), d.compute(snapshot))).collect(),
            organs: self.organs.iter().map(|d| (d.key.clone(), d.compute(snapshot))).collect(),
            arousal: self.arousal.compute(snapshot),
        }
    }
}

/// All composite series for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// Generation of the snapshot these were computed from
    pub generation: u64,
    pub meters: BTreeMap<String, CompositeSeries>,
    pub organs: BTreeMap<String, CompositeSeries>,
    pub arousal: ArousalSeries,
}

impl DerivedMetrics {
    /// Meter value at a playhead; 0.0 for unknown keys.
    pub fn meter(&self, key: &str, playhead_min: f64) -> f64 {
        self.meters.get(key).map(|s| s.sample(playhead_min)).unwrap_or(0.0)
    }

    /// Organ score at a playhead; 0.0 for unknown keys.
    pub fn organ(&self, key: &str, playhead_min: f64) -> f64 {
        self.organs.get(key).map(|s| s.sample(playhead_min)).unwrap_or(0.0)
    }

    pub fn autonomic_state(&self, playhead_min: f64) -> AutonomicState {
        self.arousal.sample_state(playhead_min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pharmacology::TargetRegistry;
    use crate::simulation::SimulationGrid;

    fn registry() -> SignalRegistry {
        SignalRegistry::builtin(&TargetRegistry::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_builtin_catalog_builds() {
        let catalog = ProjectionCatalog::builtin(&registry()).unwrap();
        assert_eq!(catalog.meters.len(), 8);
        assert_eq!(catalog.organs.len(), 7);
        assert_eq!(catalog.keys().len(), 17);
        assert!(catalog.get("sleepPressure").is_some());
        assert!(catalog.get("sympathetic").is_some());
        assert!(catalog.get("spleen").is_none());
    }

    #[test]
    fn test_meters_read_half_at_tonic() {
        let registry = registry();
        let catalog = ProjectionCatalog::builtin(&registry).unwrap();
        let grid = SimulationGrid::new(SimulationGrid::default().origin, 0.0, 5.0, 3);
        let series = SignalKey::ALL
            .iter()
            .map(|&k| (k, vec![registry.definition(k).tonic(); 3].into()))
            .collect();
        let snapshot = SeriesSnapshot::new(0, grid, series);
        let metrics = catalog.compute(&snapshot);
        for (key, meter) in &metrics.meters {
            assert!((meter.value_at(1) - 0.5).abs() < 1e-9, "{} = {}", key, meter.value_at(1));
        }
        for (key, organ) in &metrics.organs {
            assert!(organ.value_at(1).abs() < 1e-9, "{} = {}", key, organ.value_at(1));
        }
        assert_eq!(metrics.autonomic_state(5.0), AutonomicState::Ventral);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let catalog = ProjectionCatalog::builtin(&registry()).unwrap();
        let mut meters = catalog.meters.clone();
        meters.push(catalog.meters[0].clone());
        assert!(ProjectionCatalog::new(meters, catalog.organs.clone(), catalog.arousal.clone()).is_err());
    }
}
