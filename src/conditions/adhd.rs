//! ADHD model.
//!
//! Elevated striatal dopamine transporter density with lower tonic
//! catecholamine tone.
//!
//! References:
//! - Dougherty DD et al. Lancet. 1999;354:2132-2133 (DAT density +70%)
//! - Volkow ND et al. JAMA. 2009;302:1084-1091

use super::{clamp_severity, scaled, ConditionModel, DynamicsAdjustments};
use crate::pharmacology::TransporterKey;
use crate::signals::{AuxiliaryKey, SignalKey};

/// Full-severity factors.
#[derive(Debug, Clone)]
pub struct AdhdConfig {
    /// DAT density relative to baseline
    /// Reference: Dougherty 1999 reports up to 1.7x; a conservative 1.3x is used
    pub dat_density: f64,
    pub dopamine_setpoint: f64,
    pub norepinephrine_setpoint: f64,
}

impl Default for AdhdConfig {
    fn default() -> Self {
        Self {
            dat_density: 1.3,
            dopamine_setpoint: 0.85,
            norepinephrine_setpoint: 0.9,
        }
    }
}

pub struct AdhdModel {
    pub severity: f64,
    pub config: AdhdConfig,
}

impl AdhdModel {
    pub fn new(severity: f64) -> Self {
        Self {
            severity: clamp_severity(severity),
            config: AdhdConfig::default(),
        }
    }
}

impl ConditionModel for AdhdModel {
    fn name(&self) -> &'static str {
        "ADHD"
    }

    fn description(&self) -> String {
        format!(
            "ADHD at severity {:.2}: DAT density x{:.2}",
            self.severity,
            scaled(self.config.dat_density, self.severity)
        )
    }

    fn severity(&self) -> f64 {
        self.severity
    }

    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments) {
        let s = self.severity;
        adjustments.scale_auxiliary_baseline(
            AuxiliaryKey::TransporterDensity(TransporterKey::Dat),
            scaled(self.config.dat_density, s),
        );
        adjustments.scale_setpoint(SignalKey::Dopamine, scaled(self.config.dopamine_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Norepinephrine, scaled(self.config.norepinephrine_setpoint, s));
    }
}
