//! Signal status relative to reference range and ideal tendency.

use serde::{Deserialize, Serialize};

use crate::signals::{IdealTendency, SignalDefinition};

/// Status indicator for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SignalStatus {
    /// Within the reference range, or beyond it on the favourable side
    #[default]
    Normal,
    /// Outside the reference range by less than the margin
    Warning,
    /// Further out than the margin
    Critical,
}

impl SignalStatus {
    /// Warning band width as a fraction of the reference range.
    pub const MARGIN: f64 = 0.2;

    /// Status of a value against a [min, max] range on both sides.
    pub fn from_value(value: f64, normal_min: f64, normal_max: f64) -> Self {
        Self::from_sides(value, normal_min, normal_max, true, true)
    }

    /// Status of a signal value. A `Higher` tendency never flags high
    /// values and a `Lower` tendency never flags low ones.
    pub fn assess(def: &SignalDefinition, value: f64) -> Self {
        let (min, max) = def.reference_range;
        let (check_low, check_high) = match def.ideal_tendency {
            IdealTendency::Higher => (true, false),
            IdealTendency::Lower => (false, true),
            IdealTendency::Mid | IdealTendency::None => (true, true),
        };
        Self::from_sides(value, min, max, check_low, check_high)
    }

    fn from_sides(value: f64, min: f64, max: f64, check_low: bool, check_high: bool) -> Self {
        if !value.is_finite() {
            return SignalStatus::Critical;
        }
        let margin = (max - min).abs() * Self::MARGIN;
        let low = check_low && value < min;
        let high = check_high && value > max;
        if (low && value < min - margin) || (high && value > max + margin) {
            SignalStatus::Critical
        } else if low || high {
            SignalStatus::Warning
        } else {
            SignalStatus::Normal
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalStatus::Normal => "normal",
            SignalStatus::Warning => "warning",
            SignalStatus::Critical => "critical",
        }
    }
}
