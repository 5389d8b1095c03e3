//! Condition models for chronic physiological states.
//!
//! A condition does not add dynamics of its own. It declares multiplicative
//! adjustments to existing signal dynamics, which the engine applies once per
//! run:
//! - setpoint scale (tonic and rhythm together)
//! - rhythm amplitude scale (circadian pulses only)
//! - clearance scale
//! - auxiliary baseline (receptor and transporter densities)
//!
//! References:
//! - Volkow ND et al. JAMA. 2009;302:1084-1091 (ADHD dopamine markers)
//! - Nutt DJ, Malizia AL. Br J Psychiatry. 2001;179:390-396 (GABA in anxiety)
//! - Pariante CM, Lightman SL. Trends Neurosci. 2008;31:464-468 (HPA in depression)
//! - DeFronzo RA. Diabetes. 2009;58:773-795 (insulin resistance)
//! - Chaker L et al. Lancet. 2017;390:1550-1562 (hypothyroidism)

pub mod adhd;
pub mod anxiety;
pub mod depression;
pub mod hypothyroid;
pub mod insulin_resistance;

pub use adhd::{AdhdConfig, AdhdModel};
pub use anxiety::{AnxietyConfig, AnxietyModel};
pub use depression::{DepressionConfig, DepressionModel};
pub use hypothyroid::{HypothyroidConfig, HypothyroidModel};
pub use insulin_resistance::{InsulinResistanceConfig, InsulinResistanceModel};

use std::collections::BTreeMap;

use crate::signals::{AuxiliaryKey, SignalKey};

/// Maximum accepted severity.
pub const MAX_SEVERITY: f64 = 2.0;

/// Clamp a severity into [0, MAX_SEVERITY]; non-finite becomes 0.
pub fn clamp_severity(severity: f64) -> f64 {
    if severity.is_finite() {
        severity.clamp(0.0, MAX_SEVERITY)
    } else {
        0.0
    }
}

/// Interpolate a full-severity factor: 1 at severity 0, `full` at severity 1.
pub fn scaled(full: f64, severity: f64) -> f64 {
    (1.0 + severity * (full - 1.0)).max(0.0)
}

/// Declarative per-run modifications of signal dynamics.
///
/// Every entry is a multiplier; absent entries are 1.0. Adjustments from
/// several conditions compose by multiplication.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicsAdjustments {
    pub setpoint_scale: BTreeMap<SignalKey, f64>,
    pub rhythm_scale: BTreeMap<SignalKey, f64>,
    pub clearance_scale: BTreeMap<SignalKey, f64>,
    pub auxiliary_baseline: BTreeMap<AuxiliaryKey, f64>,
}

impl DynamicsAdjustments {
    pub fn scale_setpoint(&mut self, key: SignalKey, factor: f64) {
        *self.setpoint_scale.entry(key).or_insert(1.0) *= factor;
    }

    pub fn scale_rhythm(&mut self, key: SignalKey, factor: f64) {
        *self.rhythm_scale.entry(key).or_insert(1.0) *= factor;
    }

    pub fn scale_clearance(&mut self, key: SignalKey, factor: f64) {
        *self.clearance_scale.entry(key).or_insert(1.0) *= factor;
    }

    pub fn scale_auxiliary_baseline(&mut self, key: AuxiliaryKey, factor: f64) {
        *self.auxiliary_baseline.entry(key).or_insert(1.0) *= factor;
    }

    pub fn setpoint_factor(&self, key: SignalKey) -> f64 {
        self.setpoint_scale.get(&key).copied().unwrap_or(1.0)
    }

    pub fn rhythm_factor(&self, key: SignalKey) -> f64 {
        self.rhythm_scale.get(&key).copied().unwrap_or(1.0)
    }

    pub fn clearance_factor(&self, key: SignalKey) -> f64 {
        self.clearance_scale.get(&key).copied().unwrap_or(1.0)
    }

    pub fn auxiliary_factor(&self, key: AuxiliaryKey) -> f64 {
        self.auxiliary_baseline.get(&key).copied().unwrap_or(1.0)
    }

    pub fn is_identity(&self) -> bool {
        self.setpoint_scale
            .values()
            .chain(self.rhythm_scale.values())
            .chain(self.clearance_scale.values())
            .chain(self.auxiliary_baseline.values())
            .all(|&f| f == 1.0)
    }
}

/// A chronic condition that reshapes baseline physiology.
pub trait ConditionModel: Send + Sync {
    /// Name of the condition for display
    fn name(&self) -> &'static str;

    /// Short description of the modelled state
    fn description(&self) -> String;

    /// Severity in [0, MAX_SEVERITY]; 1.0 is a typical presentation
    fn severity(&self) -> f64;

    /// Record this condition's adjustments.
    fn modify_dynamics(&self, adjustments: &mut DynamicsAdjustments);
}

/// Registry for available condition models.
pub struct ConditionRegistry;

impl ConditionRegistry {
    /// List available condition models
    pub fn list_models() -> Vec<&'static str> {
        vec!["adhd", "anxiety", "depression", "insulinResistance", "hypothyroid"]
    }

    /// Create a condition model by name at a severity.
    pub fn create(name: &str, severity: f64) -> Option<Box<dyn ConditionModel>> {
        match name.to_lowercase().as_str() {
            "adhd" => Some(Box::new(AdhdModel::new(severity))),
            "anxiety" => Some(Box::new(AnxietyModel::new(severity))),
            "depression" => Some(Box::new(DepressionModel::new(severity))),
            "insulinresistance" => Some(Box::new(InsulinResistanceModel::new(severity))),
            "hypothyroid" => Some(Box::new(HypothyroidModel::new(severity))),
            _ => None,
        }
    }

    /// Get help text for a condition model
    pub fn help(name: &str) -> Option<&'static str> {
        match name.to_lowercase().as_str() {
            "adhd" => Some(
                "ADHD Model\n\
                 Effects: DAT density up, lower tonic dopamine and norepinephrine\n\
                 Reference: Volkow ND et al. JAMA. 2009",
            ),
            "anxiety" => Some(
                "Generalized Anxiety Model\n\
                 Effects: elevated cortisol and catecholamines, reduced GABA tone and vagal tone\n\
                 Reference: Nutt DJ, Malizia AL. Br J Psychiatry. 2001",
            ),
            "depression" => Some(
                "Major Depression Model\n\
                 Effects: lower serotonin and BDNF, raised and flattened cortisol rhythm, IL-6 up\n\
                 Reference: Pariante CM, Lightman SL. Trends Neurosci. 2008",
            ),
            "insulinresistance" => Some(
                "Insulin Resistance Model\n\
                 Effects: slower glucose clearance, compensatory hyperinsulinemia\n\
                 Reference: DeFronzo RA. Diabetes. 2009",
            ),
            "hypothyroid" => Some(
                "Hypothyroidism Model\n\
                 Effects: raised TSH, lower heart rate and orexin tone\n\
                 Reference: Chaker L et al. Lancet. 2017",
            ),
            _ => None,
        }
    }

    /// Collect adjustments for a list of (name, severity) pairs.
    ///
    /// Unknown names are logged and returned in the second element.
    pub fn adjustments_for<'a, I>(conditions: I) -> (DynamicsAdjustments, Vec<String>)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut adjustments = DynamicsAdjustments::default();
        let mut unknown = Vec::new();
        for (name, severity) in conditions {
            match Self::create(name, severity) {
                Some(model) => {
                    log::debug!("Applying condition '{}' at severity {:.2}", model.name(), model.severity());
                    model.modify_dynamics(&mut adjustments);
                }
                None => {
                    log::warn!("Unknown condition '{}', ignoring", name);
                    unknown.push(name.to_string());
                }
            }
        }
        (adjustments, unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_registry_list() {
        let models = ConditionRegistry::list_models();
        assert_eq!(models.len(), 5);
        for name in &models {
            assert!(ConditionRegistry::create(name, 1.0).is_some(), "cannot create {}", name);
            assert!(ConditionRegistry::help(name).is_some(), "no help for {}", name);
        }
    }

    #[test]
    fn test_unknown_condition() {
        assert!(ConditionRegistry::create("lycanthropy", 1.0).is_none());
        let (adjustments, unknown) = ConditionRegistry::adjustments_for([("lycanthropy", 1.0)]);
        assert!(adjustments.is_identity());
        assert_eq!(unknown, vec!["lycanthropy".to_string()]);
    }

    #[test]
    fn test_zero_severity_is_identity() {
        for name in ConditionRegistry::list_models() {
            let (adjustments, _) = ConditionRegistry::adjustments_for([(name, 0.0)]);
            assert!(adjustments.is_identity(), "{} at severity 0 changed dynamics", name);
        }
    }

    #[test]
    fn test_adjustments_compose_multiplicatively() {
        let mut adjustments = DynamicsAdjustments::default();
        adjustments.scale_setpoint(SignalKey::Cortisol, 1.2);
        adjustments.scale_setpoint(SignalKey::Cortisol, 1.5);
        assert!((adjustments.setpoint_factor(SignalKey::Cortisol) - 1.8).abs() < 1e-12);
        assert_eq!(adjustments.setpoint_factor(SignalKey::Insulin), 1.0);
    }

    #[test]
    fn test_severity_clamped() {
        assert_eq!(clamp_severity(5.0), MAX_SEVERITY);
        assert_eq!(clamp_severity(-1.0), 0.0);
        assert_eq!(clamp_severity(f64::NAN), 0.0);
    }
}
