//! Pharmacodynamics: target binding, mechanisms and direct effects.
//!
//! Occupancy follows the Hill equation on effect-site exposure. Effect-site
//! exposure lags plasma exposure through a first-order onset filter.
//!
//! Reference: Holford NHG, Sheiner LB. Clin Pharmacokinet. 1981;6:429-453

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::signals::SignalKey;

use super::targets::{TargetHandle, TargetRegistry};

/// Default allosteric cooperativity factor.
pub const DEFAULT_COOPERATIVITY: f64 = 3.0;
/// Accepted cooperativity range.
pub const COOPERATIVITY_RANGE: (f64, f64) = (1.5, 5.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mechanism {
    Agonist,
    Antagonist,
    /// Positive allosteric modulator
    Pam,
    /// Negative allosteric modulator
    Nam,
}

/// Binding potency as authored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Potency {
    /// Inhibition constant in nM; needs the molecular weight to convert
    KiNm(f64),
    /// Half-maximal exposure, already in exposure units (mg/L or activity)
    Ec50(f64),
}

impl Potency {
    /// Half-maximal exposure in exposure units.
    ///
    /// mg/L = nM x g/mol x 1e-6
    pub fn in_exposure_units(&self, molecular_weight_g_per_mol: Option<f64>) -> Option<f64> {
        match *self {
            Potency::KiNm(ki) => molecular_weight_g_per_mol.map(|mw| ki * mw * 1e-6),
            Potency::Ec50(ec50) => Some(ec50),
        }
    }
}

/// Hill occupancy fraction c^n / (K^n + c^n).
pub fn hill_fraction(concentration: f64, half_max: f64, hill: f64) -> f64 {
    if !(concentration > 0.0) {
        return 0.0;
    }
    if !(half_max > 0.0) {
        return 1.0;
    }
    let cn = concentration.powf(hill);
    cn / (half_max.powf(hill) + cn)
}

fn default_hill() -> f64 {
    1.0
}

/// PD effect as authored in catalog data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdSpec {
    pub target: String,
    pub mechanism: Mechanism,
    pub potency: Potency,
    pub effect_gain: f64,
    #[serde(default = "default_hill")]
    pub hill: f64,
    /// Effect-site onset time constant (minutes)
    #[serde(default)]
    pub tau_min: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooperativity: Option<f64>,
}

impl PdSpec {
    pub fn new(target: &str, mechanism: Mechanism, potency: Potency, effect_gain: f64) -> Self {
        Self {
            target: target.to_string(),
            mechanism,
            potency,
            effect_gain,
            hill: 1.0,
            tau_min: 0.0,
            cooperativity: None,
        }
    }

    pub fn with_hill(mut self, hill: f64) -> Self {
        self.hill = hill;
        self
    }

    pub fn with_onset(mut self, tau_min: f64) -> Self {
        self.tau_min = tau_min;
        self
    }

    pub fn with_cooperativity(mut self, alpha: f64) -> Self {
        self.cooperativity = Some(alpha);
        self
    }

    /// Resolve the target and convert potency to exposure units.
    pub fn compile(
        &self,
        intervention: &str,
        targets: &TargetRegistry,
        molecular_weight_g_per_mol: Option<f64>,
    ) -> Result<PdEffect, ConfigurationError> {
        let invalid = |reason: String| ConfigurationError::InvalidPdEffect {
            intervention: intervention.to_string(),
            target: self.target.clone(),
            reason,
        };

        let target = targets.resolve(&self.target).ok_or_else(|| ConfigurationError::UnknownTarget {
            intervention: intervention.to_string(),
            target: self.target.clone(),
        })?;

        let half_max = self
            .potency
            .in_exposure_units(molecular_weight_g_per_mol)
            .ok_or_else(|| invalid("Ki given without a molecular weight".to_string()))?;
        if !(half_max.is_finite() && half_max > 0.0) {
            return Err(invalid(format!("potency must be positive, got {}", half_max)));
        }
        if !(self.hill.is_finite() && self.hill > 0.0) {
            return Err(invalid(format!("Hill coefficient must be positive, got {}", self.hill)));
        }
        if !(self.tau_min.is_finite() && self.tau_min >= 0.0) {
            return Err(invalid(format!("onset tau must be non-negative, got {}", self.tau_min)));
        }
        if !self.effect_gain.is_finite() {
            return Err(invalid("effect gain is not finite".to_string()));
        }

        let allosteric = matches!(self.mechanism, Mechanism::Pam | Mechanism::Nam);
        if allosteric && !matches!(target, TargetHandle::Receptor(_)) {
            return Err(invalid("allosteric modulation applies to receptors only".to_string()));
        }
        let cooperativity = self.cooperativity.unwrap_or(DEFAULT_COOPERATIVITY);
        if allosteric && !(COOPERATIVITY_RANGE.0..=COOPERATIVITY_RANGE.1).contains(&cooperativity) {
            return Err(invalid(format!(
                "cooperativity {} outside [{}, {}]",
                cooperativity, COOPERATIVITY_RANGE.0, COOPERATIVITY_RANGE.1
            )));
        }

        Ok(PdEffect {
            target,
            mechanism: self.mechanism,
            half_max,
            effect_gain: self.effect_gain,
            hill: self.hill,
            onset_tau_min: self.tau_min,
            cooperativity,
        })
    }
}

/// Compiled PD effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdEffect {
    pub target: TargetHandle,
    pub mechanism: Mechanism,
    /// Half-maximal effect-site exposure (exposure units)
    pub half_max: f64,
    pub effect_gain: f64,
    pub hill: f64,
    pub onset_tau_min: f64,
    pub cooperativity: f64,
}

impl PdEffect {
    /// Fractional occupancy at an effect-site exposure.
    pub fn occupancy(&self, exposure: f64) -> f64 {
        hill_fraction(exposure, self.half_max, self.hill)
    }

    /// Multiplicative potency factor this modulator applies to its receptor.
    ///
    /// PAM: 1 + (alpha - 1) * occ, NAM: the reciprocal. 1.0 for direct
    /// ligands.
    pub fn potency_factor(&self, exposure: f64) -> f64 {
        let boost = 1.0 + (self.cooperativity - 1.0) * self.occupancy(exposure);
        match self.mechanism {
            Mechanism::Pam => boost,
            Mechanism::Nam => 1.0 / boost,
            Mechanism::Agonist | Mechanism::Antagonist => 1.0,
        }
    }
}

/// First-order effect-site filter over a uniformly sampled plasma curve.
pub fn effect_site_curve(plasma: &[f64], tau_min: f64, step_min: f64) -> Vec<f64> {
    if tau_min <= 0.0 {
        return plasma.to_vec();
    }
    let alpha = 1.0 - (-step_min / tau_min).exp();
    let mut out = Vec::with_capacity(plasma.len());
    let mut ce = 0.0;
    for &c in plasma {
        ce += (c - ce) * alpha;
        out.push(ce);
    }
    out
}

/// Whether a direct effect adds production or scales clearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DirectKind {
    Drive,
    Clearance,
}

/// Target-free effect of exposure on a signal: `gain * exposure^exponent`.
///
/// Drive adds to production (signal units per minute); clearance multiplies
/// clearance by `1 + value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectEffect {
    pub signal: SignalKey,
    pub kind: DirectKind,
    pub gain: f64,
    #[serde(default = "default_hill")]
    pub exponent: f64,
}

impl DirectEffect {
    pub fn drive(signal: SignalKey, gain: f64, exponent: f64) -> Self {
        Self {
            signal,
            kind: DirectKind::Drive,
            gain,
            exponent,
        }
    }

    pub fn clearance(signal: SignalKey, gain: f64, exponent: f64) -> Self {
        Self {
            signal,
            kind: DirectKind::Clearance,
            gain,
            exponent,
        }
    }

    pub fn value(&self, exposure: f64) -> f64 {
        if exposure <= 0.0 {
            return 0.0;
        }
        self.gain * exposure.powf(self.exponent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hill_fraction() {
        assert_eq!(hill_fraction(0.0, 1.0, 1.0), 0.0);
        assert!((hill_fraction(1.0, 1.0, 1.0) - 0.5).abs() < 1e-12);
        assert!((hill_fraction(3.0, 1.0, 2.0) - 0.9).abs() < 1e-12);
        assert_eq!(hill_fraction(f64::NAN, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_ki_conversion() {
        // Caffeine A1: 12000 nM at 194.19 g/mol
        let mg_per_L = Potency::KiNm(12000.0).in_exposure_units(Some(194.19)).unwrap();
        assert!((mg_per_L - 2.33028).abs() < 1e-6, "{}", mg_per_L);
        assert!(Potency::KiNm(10.0).in_exposure_units(None).is_none());
    }

    #[test]
    fn test_unknown_target_is_configuration_error() {
        let targets = TargetRegistry::builtin().unwrap();
        let spec = PdSpec::new("5HT2A", Mechanism::Agonist, Potency::Ec50(1.0), 1.0);
        assert_eq!(
            spec.compile("psilocybin", &targets, None),
            Err(ConfigurationError::UnknownTarget {
                intervention: "psilocybin".to_string(),
                target: "5HT2A".to_string(),
            })
        );
    }

    #[test]
    fn test_allosteric_on_enzyme_rejected() {
        let targets = TargetRegistry::builtin().unwrap();
        let spec = PdSpec::new("MAO_A", Mechanism::Pam, Potency::Ec50(1.0), 1.0);
        assert!(spec.compile("x", &targets, None).is_err());
    }

    #[test]
    fn test_potency_factor() {
        let targets = TargetRegistry::builtin().unwrap();
        let pam = PdSpec::new("GABA_A", Mechanism::Pam, Potency::Ec50(1.0), 1.0)
            .compile("x", &targets, None)
            .unwrap();
        assert!((pam.potency_factor(1.0) - 2.0).abs() < 1e-12);
        let nam = PdSpec::new("GABA_A", Mechanism::Nam, Potency::Ec50(1.0), 1.0)
            .compile("x", &targets, None)
            .unwrap();
        assert!((nam.potency_factor(1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_effect_site_lags_plasma() {
        let plasma = vec![1.0; 10];
        let site = effect_site_curve(&plasma, 10.0, 5.0);
        assert!(site[0] < 1.0 && site[0] > 0.0);
        assert!(site.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(effect_site_curve(&plasma, 0.0, 5.0), plasma);
    }
}
