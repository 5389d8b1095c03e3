//! Insulin resistance model.
//!
//! Reduced insulin-mediated glucose disposal with compensatory
//! hyperinsulinemia, giving mildly raised fasting glucose.
//!
//! Validation targets (severity 1.0):
//! | Marker          | Healthy | Resistant |
//! |-----------------|---------|-----------|
//! | Fasting glucose | ~88     | ~100-105  |
//! | Fasting insulin | ~6      | ~12       |
//!
//! Reference: DeFronzo RA. Diabetes. 2009;58:773-795

use super::{clamp_severity, scaled, ConditionModel, DynamicsAdjustments};
use crate::signals::SignalKey;

#[derive(Debug, Clone)]
pub struct InsulinResistanceConfig {
    pub glucose_clearance: f64,
    pub insulin_setpoint: f64,
}

impl Default for InsulinResistanceConfig {
    fn default() -> Self {
        Self {
            glucose_clearance: 0.85,
            insulin_setpoint: 2.0,
        }
    }
}

pub struct InsulinResistanceModel {
    pub severity: f64,
    pub config: InsulinResistanceConfig,
}

impl InsulinResistanceModel {
    pub fn new(severity: f64) -> Self {
        Self {
            severity: clamp_severity(severity),
            config: InsulinResistanceConfig::default(),
        }
    }
}

impl ConditionModel for InsulinResistanceModel {
    fn name(&self) -> &'static str {
        "Insulin Resistance"
    }

    fn description(&self) -> String {
        format!(
            "Insulin resistance at severity {:.2}: glucose clearance x{:.2}",
            self.severity,
            scaled(self.config.glucose_clearance, self.severity)
        )
    }

    fn severity(&self) -> f64 {
        self.severity
    }

    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments) {
        let s = self.severity;
        adjustments.scale_clearance(SignalKey::Glucose, scaled(self.config.glucose_clearance, s));
        adjustments.scale_setpoint(SignalKey::Insulin, scaled(self.config.insulin_setpoint, s));
    }
}
