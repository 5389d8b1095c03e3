//! Signal registry with the built-in physiology.
//!
//! Lookup is total: keys without an explicit definition resolve to the
//! neutral fallback (setpoint 0, tau 60 minutes).
//!
//! References:
//! - Debono M et al. J Clin Endocrinol Metab. 2009;94:1548-1554 (cortisol rhythm)
//! - Arendt J. Rev Reprod. 1998;3:13-22 (melatonin)
//! - Van Cauter E et al. Endocr Rev. 1997;18:716-738 (metabolic and GH rhythms)
//! - Cummings DE et al. Diabetes. 2001;50:1714-1719 (ghrelin meal peaks)
//! - Porkka-Heiskanen T et al. Science. 1997;276:1265-1268 (adenosine)

use std::collections::BTreeMap;

use crate::error::ConfigurationError;
use crate::pharmacology::TargetRegistry;

use super::auxiliary::{auxiliaries_for, AuxiliaryDefinition, AuxiliaryKey};
use super::circadian::Pulse;
use super::dynamics::{Coupling, IdealTendency, Rectify, SignalDefinition};
use super::keys::SignalKey;

#[derive(Debug, Clone)]
pub struct SignalRegistry {
    definitions: BTreeMap<SignalKey, SignalDefinition>,
    auxiliaries: BTreeMap<AuxiliaryKey, AuxiliaryDefinition>,
}

impl SignalRegistry {
    /// Built-in signals plus auxiliaries for every target in `targets`.
    pub fn builtin(targets: &TargetRegistry) -> Result<Self, ConfigurationError> {
        Self::from_definitions(builtin_definitions(), auxiliaries_for(targets))
    }

    /// Build a registry from explicit definitions, validating each one.
    pub fn from_definitions(
        definitions: Vec<SignalDefinition>,
        auxiliaries: BTreeMap<AuxiliaryKey, AuxiliaryDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut map = BTreeMap::new();
        for def in definitions {
            validate_definition(&def)?;
            let key = def.key;
            if map.insert(key, def).is_some() {
                return Err(ConfigurationError::DuplicateKey(key.as_str().to_string()));
            }
        }
        Ok(Self {
            definitions: map,
            auxiliaries,
        })
    }

    /// Replace or add one definition.
    pub fn with_definition(mut self, def: SignalDefinition) -> Result<Self, ConfigurationError> {
        validate_definition(&def)?;
        self.definitions.insert(def.key, def);
        Ok(self)
    }

    /// Explicit definition, if one exists.
    pub fn explicit(&self, key: SignalKey) -> Option<&SignalDefinition> {
        self.definitions.get(&key)
    }

    /// Definition for any key, falling back to neutral dynamics.
    pub fn definition(&self, key: SignalKey) -> SignalDefinition {
        self.definitions
            .get(&key)
            .cloned()
            .unwrap_or_else(|| SignalDefinition::neutral(key))
    }

    /// One definition per key, in state-vector order.
    pub fn get_all_definitions(&self) -> Vec<SignalDefinition> {
        SignalKey::ALL.iter().map(|&key| self.definition(key)).collect()
    }

    pub fn auxiliaries(&self) -> &BTreeMap<AuxiliaryKey, AuxiliaryDefinition> {
        &self.auxiliaries
    }

    /// Number of keys with an explicit definition.
    pub fn explicit_count(&self) -> usize {
        self.definitions.len()
    }
}

fn validate_definition(def: &SignalDefinition) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidDefinition {
        key: def.key.as_str().to_string(),
        reason,
    };
    if !(def.dynamics.tau_min.is_finite() && def.dynamics.tau_min > 0.0) {
        return Err(invalid(format!("tau {} must be positive", def.dynamics.tau_min)));
    }
    if !def.dynamics.setpoint.tonic.is_finite() {
        return Err(invalid("tonic setpoint is not finite".to_string()));
    }
    for coupling in &def.dynamics.couplings {
        if !(coupling.gain.is_finite() && coupling.reference.is_finite()) {
            return Err(invalid(format!("coupling from {} is not finite", coupling.source)));
        }
        if coupling.source == def.key {
            return Err(invalid("self-coupling".to_string()));
        }
    }
    Ok(())
}

/// Built-in signal set.
pub fn builtin_definitions() -> Vec<SignalDefinition> {
    use IdealTendency::*;
    use Rectify::{Deficit, Excess};
    use SignalKey::*;

    vec![
        // ====================================================================
        // HPA axis and catecholamines
        // ====================================================================
        SignalDefinition::new(Cortisol, "Cortisol", "µg/dL", 3.0, 45.0)
            .with_pulse(Pulse::gaussian(450.0, 100.0, 13.0))
            .with_pulse(Pulse::gaussian(750.0, 60.0, 2.0))
            .with_tendency(Mid)
            .with_reference_range(3.0, 23.0),
        SignalDefinition::new(Melatonin, "Melatonin", "pg/mL", 3.0, 40.0)
            .with_pulse(Pulse::window(1290.0, 420.0, 90.0, 60.0))
            .with_reference_range(0.0, 150.0),
        SignalDefinition::new(Adrenaline, "Adrenaline", "pg/mL", 25.0, 3.0)
            .with_pulse(Pulse::gaussian(600.0, 180.0, 15.0))
            .with_tendency(Mid)
            .with_reference_range(10.0, 90.0),
        SignalDefinition::new(Norepinephrine, "Norepinephrine", "pg/mL", 200.0, 3.0)
            .with_pulse(Pulse::cosine(720.0, 60.0))
            .with_tendency(Mid)
            .with_reference_range(70.0, 750.0),
        // ====================================================================
        // Central neurotransmitters (% of tonic tone)
        // ====================================================================
        SignalDefinition::new(Dopamine, "Dopamine", "%", 80.0, 10.0)
            .with_pulse(Pulse::gaussian(660.0, 240.0, 30.0))
            .with_coupling(Coupling::drive(Endorphin, 0.05, 100.0, Excess))
            .with_tendency(Higher)
            .with_reference_range(60.0, 160.0),
        SignalDefinition::new(Serotonin, "Serotonin", "%", 90.0, 30.0)
            .with_pulse(Pulse::window(420.0, 1320.0, 120.0, 20.0))
            .with_tendency(Higher)
            .with_reference_range(70.0, 150.0),
        SignalDefinition::new(Gaba, "GABA", "%", 100.0, 20.0)
            .with_pulse(Pulse::window(1380.0, 360.0, 120.0, 15.0))
            .with_tendency(Mid)
            .with_reference_range(70.0, 150.0),
        SignalDefinition::new(Glutamate, "Glutamate", "%", 100.0, 15.0)
            .with_pulse(Pulse::window(420.0, 1380.0, 120.0, 10.0))
            .with_tendency(Mid)
            .with_reference_range(70.0, 140.0),
        SignalDefinition::new(Acetylcholine, "Acetylcholine", "%", 90.0, 10.0)
            .with_pulse(Pulse::window(420.0, 1380.0, 120.0, 20.0))
            .with_tendency(Mid)
            .with_reference_range(60.0, 150.0),
        SignalDefinition::new(Histamine, "Histamine", "%", 60.0, 20.0)
            .with_pulse(Pulse::window(420.0, 1380.0, 90.0, 50.0))
            .with_tendency(Mid)
            .with_reference_range(40.0, 150.0),
        SignalDefinition::new(Orexin, "Orexin", "%", 40.0, 30.0)
            .with_pulse(Pulse::window(390.0, 1350.0, 90.0, 60.0))
            .with_coupling(Coupling::drive(Adenosine, -0.02, 80.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(30.0, 130.0),
        SignalDefinition::new(Adenosine, "Adenosine", "%", 50.0, 60.0)
            .with_pulse(Pulse::window(420.0, 1410.0, 600.0, 60.0))
            .with_tendency(Lower)
            .with_reference_range(40.0, 130.0),
        SignalDefinition::new(Endorphin, "Endorphin", "%", 100.0, 30.0)
            .with_tendency(Higher)
            .with_reference_range(80.0, 200.0),
        // ====================================================================
        // Anabolic, sex and thyroid hormones
        // ====================================================================
        SignalDefinition::new(GrowthHormone, "Growth hormone", "ng/mL", 0.3, 20.0)
            .with_pulse(Pulse::gaussian(60.0, 50.0, 8.0))
            .with_coupling(Coupling::clearance(Glucose, 0.02, 100.0, Excess))
            .with_tendency(Higher)
            .with_reference_range(0.1, 10.0),
        SignalDefinition::new(Testosterone, "Testosterone", "ng/dL", 450.0, 120.0)
            .with_pulse(Pulse::gaussian(450.0, 180.0, 150.0))
            .with_sex_scale(1.0, 0.07)
            .with_tendency(Mid)
            .with_reference_range(300.0, 1000.0),
        SignalDefinition::new(Estradiol, "Estradiol", "pg/mL", 25.0, 240.0)
            .with_sex_scale(1.0, 2.0)
            .with_cycle_pulse(13.0, 1.5, 200.0)
            .with_cycle_pulse(21.0, 2.5, 100.0)
            .with_tendency(Mid)
            .with_reference_range(10.0, 400.0),
        SignalDefinition::new(Progesterone, "Progesterone", "ng/mL", 0.3, 240.0)
            .with_cycle_pulse(21.0, 3.0, 12.0)
            .with_tendency(Mid)
            .with_reference_range(0.1, 25.0),
        SignalDefinition::new(Tsh, "TSH", "mIU/L", 1.5, 60.0)
            .with_pulse(Pulse::gaussian(120.0, 120.0, 1.0))
            .with_tendency(Mid)
            .with_reference_range(0.4, 4.0),
        // ====================================================================
        // Metabolic
        // ====================================================================
        SignalDefinition::new(Insulin, "Insulin", "µIU/mL", 6.0, 8.0)
            .with_coupling(Coupling::drive(Glucose, 0.06, 100.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(2.0, 25.0),
        SignalDefinition::new(Glucagon, "Glucagon", "pg/mL", 60.0, 10.0)
            .with_coupling(Coupling::drive(Glucose, 0.8, 85.0, Deficit))
            .with_tendency(Mid)
            .with_reference_range(40.0, 150.0),
        SignalDefinition::new(Glucose, "Glucose", "mg/dL", 88.0, 30.0)
            .with_pulse(Pulse::gaussian(330.0, 60.0, 6.0))
            .with_coupling(Coupling::clearance(Insulin, 0.04, 6.0, Rectify::None))
            .with_coupling(Coupling::drive(Glucagon, 0.01, 60.0, Excess))
            .with_coupling(Coupling::drive(Adrenaline, 0.005, 25.0, Excess))
            .with_coupling(Coupling::drive(Cortisol, 0.03, 10.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(70.0, 140.0),
        SignalDefinition::new(Ghrelin, "Ghrelin", "pg/mL", 500.0, 30.0)
            .with_pulse(Pulse::gaussian(450.0, 45.0, 250.0))
            .with_pulse(Pulse::gaussian(720.0, 45.0, 250.0))
            .with_pulse(Pulse::gaussian(1110.0, 45.0, 250.0))
            .with_coupling(Coupling::clearance(Insulin, 0.03, 6.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(300.0, 1200.0),
        SignalDefinition::new(Leptin, "Leptin", "ng/mL", 10.0, 240.0)
            .with_pulse(Pulse::cosine(60.0, 2.0))
            .with_coupling(Coupling::drive(Insulin, 0.002, 6.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(4.0, 25.0),
        SignalDefinition::new(Ketones, "Ketones", "mM", 0.2, 90.0)
            .with_pulse(Pulse::window(1380.0, 420.0, 120.0, 0.2))
            .with_coupling(Coupling::clearance(Insulin, 0.1, 6.0, Excess))
            .with_tendency(Mid)
            .with_reference_range(0.05, 1.5),
        SignalDefinition::new(Lactate, "Lactate", "mM", 1.0, 10.0)
            .with_tendency(Lower)
            .with_reference_range(0.5, 2.2),
        // ====================================================================
        // Autonomic and inflammatory
        // ====================================================================
        SignalDefinition::new(HeartRate, "Heart rate", "bpm", 62.0, 2.0)
            .with_pulse(Pulse::cosine(900.0, 6.0))
            .with_pulse(Pulse::window(1380.0, 360.0, 90.0, -6.0))
            .with_coupling(Coupling::drive(Adrenaline, 0.05, 25.0, Excess))
            .with_coupling(Coupling::drive(Norepinephrine, 0.03, 200.0, Excess))
            .with_coupling(Coupling::drive(VagalTone, -0.05, 45.0, Rectify::None))
            .with_tendency(Mid)
            .with_reference_range(50.0, 100.0),
        SignalDefinition::new(VagalTone, "Vagal tone (RMSSD)", "ms", 45.0, 5.0)
            .with_pulse(Pulse::window(1380.0, 360.0, 90.0, 15.0))
            .with_coupling(Coupling::drive(Acetylcholine, 0.05, 90.0, Rectify::None))
            .with_coupling(Coupling::drive(Norepinephrine, -0.02, 200.0, Excess))
            .with_coupling(Coupling::drive(Adrenaline, -0.02, 25.0, Excess))
            .with_tendency(Higher)
            .with_reference_range(20.0, 100.0),
        SignalDefinition::new(Il6, "IL-6", "pg/mL", 1.5, 60.0)
            .with_coupling(Coupling::clearance(Cortisol, 0.05, 10.0, Excess))
            .with_tendency(Lower)
            .with_reference_range(0.5, 7.0),
        SignalDefinition::new(Bdnf, "BDNF", "ng/mL", 20.0, 60.0)
            .with_tendency(Higher)
            .with_reference_range(10.0, 40.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SignalRegistry {
        SignalRegistry::builtin(&TargetRegistry::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_lookup_is_total() {
        let registry = registry();
        let all = registry.get_all_definitions();
        assert_eq!(all.len(), SignalKey::COUNT);
        for (def, key) in all.iter().zip(SignalKey::ALL) {
            assert_eq!(def.key, key);
        }
    }

    #[test]
    fn test_undefined_keys_fall_back_to_neutral() {
        let registry = registry();
        assert!(registry.explicit(SignalKey::Oxytocin).is_none());
        let def = registry.definition(SignalKey::Oxytocin);
        assert_eq!(def.tonic(), 0.0);
        assert_eq!(def.dynamics.tau_min, 60.0);
        assert!(def.dynamics.couplings.is_empty());
    }

    #[test]
    fn test_duplicate_definition_rejected() {
        let defs = vec![
            SignalDefinition::new(SignalKey::Lactate, "Lactate", "mM", 1.0, 10.0),
            SignalDefinition::new(SignalKey::Lactate, "Lactate", "mM", 1.0, 10.0),
        ];
        let err = SignalRegistry::from_definitions(defs, BTreeMap::new()).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateKey("lactate".to_string()));
    }

    #[test]
    fn test_nonpositive_tau_rejected() {
        let defs = vec![SignalDefinition::new(SignalKey::Lactate, "Lactate", "mM", 1.0, 0.0)];
        assert!(SignalRegistry::from_definitions(defs, BTreeMap::new()).is_err());
    }
}
