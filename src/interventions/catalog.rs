//! Intervention catalog: authored specs and their compiled, validated form.
//!
//! All name resolution and PK/PD validation happens in
//! [`InterventionCatalog::compile`]; the engine only ever sees compiled
//! definitions.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::pharmacology::{DirectEffect, DirectKind, PdEffect, PdSpec, PkModel, PkSpec, TargetRegistry};
use crate::signals::SignalKey;

use super::params::ParamDef;

/// Molecule identity, needed to convert Ki values to mg/L.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoleculeProfile {
    pub name: String,
    pub molecular_weight_g_per_mol: f64,
}

/// How a parameter becomes the amount fed to the PK model.
///
/// amount = param value x `per_unit` x item intensity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoseRule {
    pub param: String,
    pub per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacologySpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecule: Option<MoleculeProfile>,
    pub dose: DoseRule,
    pub pk: PkSpec,
    #[serde(default)]
    pub pd: Vec<PdSpec>,
    #[serde(default)]
    pub direct: Vec<DirectEffect>,
}

/// Gastric emptying delay: base + per-gram terms for fat and fiber, capped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GastricDelay {
    pub base_min: f64,
    pub fat_param: String,
    pub per_fat_g_min: f64,
    pub fiber_param: String,
    pub per_fiber_g_min: f64,
    pub max_min: f64,
}

impl GastricDelay {
    pub fn minutes(&self, params: &BTreeMap<String, f64>) -> f64 {
        let fat = params.get(&self.fat_param).copied().unwrap_or(0.0);
        let fiber = params.get(&self.fiber_param).copied().unwrap_or(0.0);
        (self.base_min + self.per_fat_g_min * fat + self.per_fiber_g_min * fiber).clamp(0.0, self.max_min)
    }
}

/// A macronutrient-driven effect following a gamma-shaped absorption curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientEffect {
    /// Parameters whose amounts are summed
    pub params: Vec<String>,
    pub signal: SignalKey,
    pub kind: DirectKind,
    /// Per unit of summed amount, at the curve peak
    pub gain_per_unit: f64,
    /// Time from end of gastric delay to peak (minutes)
    pub peak_min: f64,
}

impl NutrientEffect {
    pub fn new(params: &[&str], signal: SignalKey, kind: DirectKind, gain_per_unit: f64, peak_min: f64) -> Self {
        Self {
            params: params.iter().map(|p| p.to_string()).collect(),
            signal,
            kind,
            gain_per_unit,
            peak_min,
        }
    }

    /// Time to peak once the meal's rise window is applied.
    pub fn effective_peak_min(&self, rise_window_min: f64) -> f64 {
        if rise_window_min > 0.0 {
            self.peak_min.min(rise_window_min)
        } else {
            self.peak_min
        }
    }

    /// Effect value `t_min` after the gastric delay. The curve peaks at
    /// `peak_min` or at the end of the rise window, whichever comes first.
    pub fn value(&self, amount: f64, t_min: f64, rise_window_min: f64) -> f64 {
        if t_min <= 0.0 || amount <= 0.0 {
            return 0.0;
        }
        let x = t_min / self.effective_peak_min(rise_window_min);
        self.gain_per_unit * amount * x * (1.0 - x).exp()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSpec {
    pub gastric_delay: GastricDelay,
    /// Window after the delay in which the primary glucose response peaks
    pub rise_window_min: f64,
    pub effects: Vec<NutrientEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ProfileSpec {
    Pharmacology(PharmacologySpec),
    Nutrition(NutritionSpec),
}

/// An intervention as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionSpec {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub default_duration_min: f64,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    pub profile: ProfileSpec,
}

/// Compiled pharmacology profile.
#[derive(Debug, Clone, PartialEq)]
pub struct PharmacologyProfile {
    pub molecule: Option<MoleculeProfile>,
    pub dose: DoseRule,
    pub pk: PkModel,
    pub pd: Vec<PdEffect>,
    pub direct: Vec<DirectEffect>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Profile {
    Pharmacology(PharmacologyProfile),
    Nutrition(NutritionSpec),
}

/// A compiled intervention.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionDefinition {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub default_duration_min: f64,
    pub params: Vec<ParamDef>,
    pub profile: Profile,
}

impl InterventionDefinition {
    pub fn param(&self, key: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.key == key)
    }
}

impl InterventionSpec {
    /// Validate and resolve against the target registry.
    pub fn compile(&self, targets: &TargetRegistry) -> Result<InterventionDefinition, ConfigurationError> {
        let key = self.key.as_str();
        let mut seen = Vec::with_capacity(self.params.len());
        for param in &self.params {
            param.validate(key)?;
            if seen.contains(&param.key.as_str()) {
                return Err(ConfigurationError::InvalidParameter {
                    intervention: key.to_string(),
                    param: param.key.clone(),
                    reason: "declared twice".to_string(),
                });
            }
            seen.push(param.key.as_str());
        }
        let require_param = |name: &str| -> Result<(), ConfigurationError> {
            if seen.contains(&name) {
                Ok(())
            } else {
                Err(ConfigurationError::InvalidParameter {
                    intervention: key.to_string(),
                    param: name.to_string(),
                    reason: "referenced but not declared".to_string(),
                })
            }
        };

        let profile = match &self.profile {
            ProfileSpec::Pharmacology(spec) => {
                require_param(&spec.dose.param)?;
                let molecular_weight = match &spec.molecule {
                    Some(molecule) if !(molecule.molecular_weight_g_per_mol > 0.0) => {
                        return Err(ConfigurationError::InvalidDefinition {
                            key: key.to_string(),
                            reason: format!("molecular weight of {} must be positive", molecule.name),
                        })
                    }
                    Some(molecule) => Some(molecule.molecular_weight_g_per_mol),
                    None => None,
                };
                let pk = spec.pk.compile(key)?;
                let pd = spec
                    .pd
                    .iter()
                    .map(|effect| effect.compile(key, targets, molecular_weight))
                    .collect::<Result<Vec<_>, _>>()?;
                for direct in &spec.direct {
                    if !(direct.gain.is_finite() && direct.exponent.is_finite() && direct.exponent > 0.0) {
                        return Err(ConfigurationError::InvalidDefinition {
                            key: key.to_string(),
                            reason: format!("direct effect on {} is malformed", direct.signal),
                        });
                    }
                }
                Profile::Pharmacology(PharmacologyProfile {
                    molecule: spec.molecule.clone(),
                    dose: spec.dose.clone(),
                    pk,
                    pd,
                    direct: spec.direct.clone(),
                })
            }
            ProfileSpec::Nutrition(spec) => {
                require_param(&spec.gastric_delay.fat_param)?;
                require_param(&spec.gastric_delay.fiber_param)?;
                if !(spec.rise_window_min > 0.0 && spec.rise_window_min.is_finite()) {
                    return Err(ConfigurationError::InvalidDefinition {
                        key: key.to_string(),
                        reason: "rise window must be positive".to_string(),
                    });
                }
                for effect in &spec.effects {
                    for param in &effect.params {
                        require_param(param)?;
                    }
                    if !(effect.peak_min > 0.0) {
                        return Err(ConfigurationError::InvalidDefinition {
                            key: key.to_string(),
                            reason: format!("nutrient effect on {} needs a positive peak time", effect.signal),
                        });
                    }
                }
                Profile::Nutrition(spec.clone())
            }
        };

        Ok(InterventionDefinition {
            key: self.key.clone(),
            label: self.label.clone(),
            icon: self.icon.clone(),
            default_duration_min: self.default_duration_min,
            params: self.params.clone(),
            profile,
        })
    }
}

/// Compiled intervention definitions by key.
#[derive(Debug, Clone, Default)]
pub struct InterventionCatalog {
    definitions: BTreeMap<String, InterventionDefinition>,
}

impl InterventionCatalog {
    /// Compile a list of specs. Fails on the first invalid spec.
    pub fn compile(specs: &[InterventionSpec], targets: &TargetRegistry) -> Result<Self, ConfigurationError> {
        let mut definitions = BTreeMap::new();
        for spec in specs {
            let def = spec.compile(targets)?;
            match definitions.entry(def.key.clone()) {
                Entry::Occupied(_) => return Err(ConfigurationError::DuplicateKey(def.key)),
                Entry::Vacant(slot) => {
                    slot.insert(def);
                }
            }
        }
        log::debug!("Compiled {} interventions", definitions.len());
        Ok(Self { definitions })
    }

    /// The built-in catalog.
    pub fn builtin(targets: &TargetRegistry) -> Result<Self, ConfigurationError> {
        Self::compile(&super::builtin::builtin_specs(), targets)
    }

    /// Compile a catalog from a JSON array of specs.
    pub fn from_json(json: &str, targets: &TargetRegistry) -> anyhow::Result<Self> {
        let specs: Vec<InterventionSpec> = serde_json::from_str(json)?;
        Ok(Self::compile(&specs, targets)?)
    }

    pub fn get(&self, key: &str) -> Option<&InterventionDefinition> {
        self.definitions.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &InterventionDefinition> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
