//! Signal definitions: setpoint, relaxation time and inter-signal couplings.

use serde::{Deserialize, Serialize};

use super::circadian::{CyclePulse, Pulse, Setpoint, SexScale};
use super::keys::SignalKey;

/// Which direction of deviation from the tonic level is considered healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdealTendency {
    Higher,
    Lower,
    Mid,
    #[default]
    None,
}

/// How a coupling reads its source deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rectify {
    /// Signed deviation
    None,
    /// Only the part above the reference
    Excess,
    /// Only the part below the reference (reported as a positive number)
    Deficit,
}

/// What a coupling acts on in the target signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouplingEffect {
    /// Adds `gain * deviation` to production (target units per minute)
    Drive,
    /// Multiplies clearance by `1 + gain * deviation`
    Clearance,
}

/// Influence of one signal's previous-step value on another signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coupling {
    pub source: SignalKey,
    pub effect: CouplingEffect,
    pub gain: f64,
    pub reference: f64,
    pub rectify: Rectify,
}

impl Coupling {
    pub fn drive(source: SignalKey, gain: f64, reference: f64, rectify: Rectify) -> Self {
        Self {
            source,
            effect: CouplingEffect::Drive,
            gain,
            reference,
            rectify,
        }
    }

    pub fn clearance(source: SignalKey, gain: f64, reference: f64, rectify: Rectify) -> Self {
        Self {
            source,
            effect: CouplingEffect::Clearance,
            gain,
            reference,
            rectify,
        }
    }

    /// Source deviation after rectification.
    pub fn deviation(&self, source_value: f64) -> f64 {
        let d = source_value - self.reference;
        match self.rectify {
            Rectify::None => d,
            Rectify::Excess => d.max(0.0),
            Rectify::Deficit => (-d).max(0.0),
        }
    }
}

/// Dynamics of a single signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDynamics {
    pub setpoint: Setpoint,
    /// Relaxation time constant toward setpoint (minutes)
    pub tau_min: f64,
    pub couplings: Vec<Coupling>,
}

impl SignalDynamics {
    /// Neutral dynamics: constant zero setpoint, 60 minute relaxation, no couplings.
    pub fn neutral() -> Self {
        Self {
            setpoint: Setpoint::constant(0.0),
            tau_min: 60.0,
            couplings: Vec::new(),
        }
    }
}

/// Complete definition of a signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalDefinition {
    pub key: SignalKey,
    pub label: String,
    pub unit: String,
    pub dynamics: SignalDynamics,
    /// Starting value; `None` starts at the setpoint of the first grid point
    pub initial_value: Option<f64>,
    pub ideal_tendency: IdealTendency,
    /// Typical physiological range, used for display status only
    pub reference_range: (f64, f64),
    pub non_negative: bool,
}

impl SignalDefinition {
    pub fn new(key: SignalKey, label: &str, unit: &str, tonic: f64, tau_min: f64) -> Self {
        Self {
            key,
            label: label.to_string(),
            unit: unit.to_string(),
            dynamics: SignalDynamics {
                setpoint: Setpoint::constant(tonic),
                tau_min,
                couplings: Vec::new(),
            },
            initial_value: None,
            ideal_tendency: IdealTendency::None,
            reference_range: (0.0, 0.0),
            non_negative: true,
        }
    }

    /// Fallback used for keys without an explicit definition.
    pub fn neutral(key: SignalKey) -> Self {
        Self {
            key,
            label: key.as_str().to_string(),
            unit: String::new(),
            dynamics: SignalDynamics::neutral(),
            initial_value: None,
            ideal_tendency: IdealTendency::None,
            reference_range: (0.0, 0.0),
            non_negative: true,
        }
    }

    pub fn with_pulse(mut self, pulse: Pulse) -> Self {
        self.dynamics.setpoint.pulses.push(pulse);
        self
    }

    pub fn with_sex_scale(mut self, male: f64, female: f64) -> Self {
        self.dynamics.setpoint.sex_scale = Some(SexScale { male, female });
        self
    }

    pub fn with_cycle_pulse(mut self, center_day: f64, width_days: f64, amplitude: f64) -> Self {
        self.dynamics.setpoint.cycle_pulses.push(CyclePulse {
            center_day,
            width_days,
            amplitude,
        });
        self
    }

    pub fn with_coupling(mut self, coupling: Coupling) -> Self {
        self.dynamics.couplings.push(coupling);
        self
    }

    pub fn with_tendency(mut self, tendency: IdealTendency) -> Self {
        self.ideal_tendency = tendency;
        self
    }

    pub fn with_reference_range(mut self, low: f64, high: f64) -> Self {
        self.reference_range = (low, high);
        self
    }

    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.initial_value = Some(value);
        self
    }

    /// Tonic setpoint level, the reference for relative weights.
    pub fn tonic(&self) -> f64 {
        self.dynamics.setpoint.tonic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectified_deviation() {
        let excess = Coupling::drive(SignalKey::Glucose, 0.06, 100.0, Rectify::Excess);
        assert_eq!(excess.deviation(130.0), 30.0);
        assert_eq!(excess.deviation(80.0), 0.0);

        let deficit = Coupling::drive(SignalKey::Glucose, 0.8, 85.0, Rectify::Deficit);
        assert_eq!(deficit.deviation(80.0), 5.0);
        assert_eq!(deficit.deviation(90.0), 0.0);

        let signed = Coupling::clearance(SignalKey::Insulin, 0.04, 6.0, Rectify::None);
        assert_eq!(signed.deviation(4.0), -2.0);
    }
}
