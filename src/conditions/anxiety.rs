//! Generalized anxiety model.
//!
//! References:
//! - Nutt DJ, Malizia AL. Br J Psychiatry. 2001;179:390-396
//! - Chalmers JA et al. Front Psychiatry. 2014;5:80 (reduced HRV)

use super::{clamp_severity, scaled, ConditionModel, DynamicsAdjustments};
use crate::pharmacology::ReceptorKey;
use crate::signals::{AuxiliaryKey, SignalKey};

#[derive(Debug, Clone)]
pub struct AnxietyConfig {
    pub cortisol_setpoint: f64,
    pub catecholamine_setpoint: f64,
    pub gaba_setpoint: f64,
    /// Benzodiazepine-site binding reduction
    /// Reference: Malizia AL et al. Arch Gen Psychiatry. 1998;55:715-720
    pub gaba_a_density: f64,
    pub vagal_setpoint: f64,
}

impl Default for AnxietyConfig {
    fn default() -> Self {
        Self {
            cortisol_setpoint: 1.25,
            catecholamine_setpoint: 1.2,
            gaba_setpoint: 0.85,
            gaba_a_density: 0.8,
            vagal_setpoint: 0.75,
        }
    }
}

pub struct AnxietyModel {
    pub severity: f64,
    pub config: AnxietyConfig,
}

impl AnxietyModel {
    pub fn new(severity: f64) -> Self {
        Self {
            severity: clamp_severity(severity),
            config: AnxietyConfig::default(),
        }
    }
}

impl ConditionModel for AnxietyModel {
    fn name(&self) -> &'static str {
        "Generalized Anxiety"
    }

    fn description(&self) -> String {
        format!("Generalized anxiety at severity {:.2}", self.severity)
    }

    fn severity(&self) -> f64 {
        self.severity
    }

    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments) {
        let s = self.severity;
        let c = &self.config;
        adjustments.scale_setpoint(SignalKey::Cortisol, scaled(c.cortisol_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Norepinephrine, scaled(c.catecholamine_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Adrenaline, scaled(c.catecholamine_setpoint, s));
        adjustments.scale_setpoint(SignalKey::Gaba, scaled(c.gaba_setpoint, s));
        adjustments.scale_setpoint(SignalKey::VagalTone, scaled(c.vagal_setpoint, s));
        adjustments.scale_auxiliary_baseline(
            AuxiliaryKey::ReceptorDensity(ReceptorKey::GabaA),
            scaled(c.gaba_a_density, s),
        );
    }
}
