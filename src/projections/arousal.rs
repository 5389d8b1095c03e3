//! Autonomic arousal: sympathetic and parasympathetic composites and their
//! balance.
//!
//! overall = sigmoid(sympathetic - parasympathetic)
//!
//! Reference: Porges SW. The polyvagal theory. Biol Psychol. 2007;74:116-143

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::signals::{sigmoid, SignalKey, SignalRegistry};
use crate::simulation::{Series, SeriesSnapshot};

use super::composite::{CompositeDefinition, CompositeSeries, DisplayRange, Nonlinearity};

/// Above this the subject is mobilized.
pub const MOBILIZED_THRESHOLD: f64 = 0.7;
/// Below this the subject is in dorsal shutdown.
pub const DORSAL_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AutonomicState {
    /// Social engagement, balanced tone
    Ventral,
    /// Fight or flight
    Mobilized,
    /// Shutdown
    Dorsal,
}

impl AutonomicState {
    pub fn classify(overall: f64) -> Self {
        if overall > MOBILIZED_THRESHOLD {
            AutonomicState::Mobilized
        } else if overall < DORSAL_THRESHOLD {
            AutonomicState::Dorsal
        } else {
            AutonomicState::Ventral
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AutonomicState::Ventral => "ventral",
            AutonomicState::Mobilized => "mobilized",
            AutonomicState::Dorsal => "dorsal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArousalProjection {
    pub sympathetic: CompositeDefinition,
    pub parasympathetic: CompositeDefinition,
}

impl ArousalProjection {
    pub fn new(sympathetic: CompositeDefinition, parasympathetic: CompositeDefinition) -> Self {
        Self {
            sympathetic,
            parasympathetic,
        }
    }

    pub fn builtin(registry: &SignalRegistry) -> Result<Self, ConfigurationError> {
        use SignalKey::*;
        let sympathetic = CompositeDefinition::relative(
            "sympathetic",
            "Sympathetic",
            &[(Norepinephrine, 0.4), (Adrenaline, 0.2), (HeartRate, 0.4), (Cortisol, 0.1)],
            Nonlinearity::Tanh,
            DisplayRange::ORGAN,
            registry,
        )?;
        let parasympathetic = CompositeDefinition::relative(
            "parasympathetic",
            "Parasympathetic",
            &[(VagalTone, 0.8), (Acetylcholine, 0.2), (HeartRate, -0.2)],
            Nonlinearity::Tanh,
            DisplayRange::ORGAN,
            registry,
        )?;
        Ok(Self::new(sympathetic, parasympathetic))
    }

    pub fn compute(&self, snapshot: &SeriesSnapshot) -> ArousalSeries {
        let sympathetic = self.sympathetic.compute(snapshot);
        let parasympathetic = self.parasympathetic.compute(snapshot);
        let overall = sympathetic
            .series
            .iter()
            .zip(parasympathetic.series.iter())
            .map(|(s, p)| sigmoid(s - p))
            .collect::<Vec<f64>>();
        ArousalSeries {
            overall: CompositeSeries {
                key: "overall".to_string(),
                grid: snapshot.grid.clone(),
                series: Series::new(overall),
            },
            sympathetic,
            parasympathetic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArousalSeries {
    pub sympathetic: CompositeSeries,
    pub parasympathetic: CompositeSeries,
    pub overall: CompositeSeries,
}

impl ArousalSeries {
    pub fn state_at(&self, index: usize) -> AutonomicState {
        AutonomicState::classify(self.overall.value_at(index))
    }

    /// Classification at a playhead. Empty series read as 0 and classify
    /// as dorsal.
    pub fn sample_state(&self, playhead_min: f64) -> AutonomicState {
        AutonomicState::classify(self.overall.sample(playhead_min))
    }

    pub fn states(&self) -> Vec<AutonomicState> {
        self.overall.series.iter().map(AutonomicState::classify).collect()
    }
}
