//! Primary hypothyroidism model.
//!
//! Reference: Chaker L et al. Lancet. 2017;390:1550-1562

use super::{clamp_severity, scaled, ConditionModel, DynamicsAdjustments};
use crate::signals::SignalKey;

#[derive(Debug, Clone)]
pub struct HypothyroidConfig {
    /// TSH relative to euthyroid (overt disease is typically >4x)
    pub tsh_setpoint: f64,
    pub heart_rate_setpoint: f64,
    pub orexin_setpoint: f64,
}

impl Default for HypothyroidConfig {
    fn default() -> Self {
        Self {
            tsh_setpoint: 4.0,
            heart_rate_setpoint: 0.9,
            orexin_setpoint: 0.9,
        }
    }
}

pub struct HypothyroidModel {
    pub severity: f64,
    pub config: HypothyroidConfig,
}

impl HypothyroidModel {
    pub fn new(severity: f64) -> Self {
        Self {
            severity: clamp_severity(severity),
            config: HypothyroidConfig::default(),
        }
    }
}

impl ConditionModel for HypothyroidModel {
    fn name(&self) -> &'static str {
        "Hypothyroidism"
    }

    fn description(&self) -> String {
        format!(
            "Hypothyroidism at severity {:.2}: TSH x{:.2}",
            self.severity,
            scaled(self.config.tsh_setpoint, self.severity)
        )
    }

    fn severity(&self) -> f64 {
        self.severity
    }

    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments) {
        let s = self.severity;
        adjustments.scale_setpoint(SignalKey::Tsh, scaled(self.config.tsh_setpoint, s));
        adjustments.scale_setpoint(SignalKey::HeartRate, scaled(self.config.heart_rate_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Orexin, scaled(self.config.orexin_setpoint, s));
    }
}
