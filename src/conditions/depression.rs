//! Major depression model.
//!
//! Lower monoamine and neurotrophic tone, HPA hyperactivity with a flattened
//! diurnal cortisol slope, and low-grade inflammation.
//!
//! References:
//! - Pariante CM, Lightman SL. Trends Neurosci. 2008;31:464-468
//! - Molendijk ML et al. Mol Psychiatry. 2014;19:791-800 (BDNF)
//! - Dowlati Y et al. Biol Psychiatry. 2010;67:446-457 (IL-6)

use super::{clamp_severity, scaled, ConditionModel, DynamicsAdjustments};
use crate::pharmacology::TransporterKey;
use crate::signals::{AuxiliaryKey, SignalKey};

#[derive(Debug, Clone)]
pub struct DepressionConfig {
    pub serotonin_setpoint: f64,
    pub dopamine_setpoint: f64,
    pub cortisol_setpoint: f64,
    /// Amplitude of the cortisol rhythm relative to healthy
    pub cortisol_rhythm: f64,
    pub bdnf_setpoint: f64,
    pub il6_setpoint: f64,
    pub sert_density: f64,
}

impl Default for DepressionConfig {
    fn default() -> Self {
        Self {
            serotonin_setpoint: 0.8,
            dopamine_setpoint: 0.9,
            cortisol_setpoint: 1.2,
            cortisol_rhythm: 0.6,
            bdnf_setpoint: 0.75,
            il6_setpoint: 1.5,
            sert_density: 1.2,
        }
    }
}

pub struct DepressionModel {
    pub severity: f64,
    pub config: DepressionConfig,
}

impl DepressionModel {
    pub fn new(severity: f64) -> Self {
        Self {
            severity: clamp_severity(severity),
            config: DepressionConfig::default(),
        }
    }
}

impl ConditionModel for DepressionModel {
    fn name(&self) -> &'static str {
        "Major Depression"
    }

    fn description(&self) -> String {
        format!(
            "Major depression at severity {:.2}: cortisol rhythm x{:.2}",
            self.severity,
            scaled(self.config.cortisol_rhythm, self.severity)
        )
    }

    fn severity(&self) -> f64 {
        self.severity
    }

    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments) {
        let s = self.severity;
        let c = &self.config;
        adjustments.scale_setpoint(SignalKey::Serotonin, scaled(c.serotonin_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Dopamine, scaled(c.dopamine_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Cortisol, scaled(c.cortisol_setpoint, s));
        adjustments.scale_rhythm(SignalKey::Cortisol, scaled(c.cortisol_rhythm, s));
        adjustments.scale_setpoint(SignalKey::Bdnf, scaled(c.bdnf_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Il6, scaled(c.il6_setpoint, s));
        adjustments.scale_auxiliary_baseline(
            AuxiliaryKey::TransporterDensity(TransporterKey::Sert),
            scaled(c.sert_density, s),
        );
    }
}
