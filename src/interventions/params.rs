//! User-facing intervention parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Declaration of one tunable parameter (dose, intensity, macronutrient grams).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDef {
    pub key: String,
    pub label: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

impl ParamDef {
    pub fn new(key: &str, label: &str, unit: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            unit: unit.to_string(),
            min,
            max,
            step,
            default,
        }
    }

    /// Clamp a provided value into range; missing or non-finite values take the default.
    pub fn resolve(&self, provided: Option<f64>) -> f64 {
        match provided {
            Some(v) if v.is_finite() => v.clamp(self.min, self.max),
            _ => self.default,
        }
    }

    pub(crate) fn validate(&self, intervention: &str) -> Result<(), ConfigurationError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min <= self.max
            && (self.min..=self.max).contains(&self.default)
            && self.step >= 0.0;
        if ok {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidParameter {
                intervention: intervention.to_string(),
                param: self.key.clone(),
                reason: format!(
                    "need min <= default <= max, got {} <= {} <= {}",
                    self.min, self.default, self.max
                ),
            })
        }
    }
}

/// Resolve every declared parameter against the values given on a timeline item.
///
/// Unknown keys in `provided` are ignored.
pub fn resolve_params(defs: &[ParamDef], provided: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    defs.iter()
        .map(|def| (def.key.clone(), def.resolve(provided.get(&def.key).copied())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_and_default() {
        let def = ParamDef::new("mg", "Dose", "mg", 0.0, 400.0, 10.0, 100.0);
        assert_eq!(def.resolve(None), 100.0);
        assert_eq!(def.resolve(Some(900.0)), 400.0);
        assert_eq!(def.resolve(Some(-5.0)), 0.0);
        assert_eq!(def.resolve(Some(f64::NAN)), 100.0);
    }

    #[test]
    fn test_resolve_params_fills_missing() {
        let defs = vec![
            ParamDef::new("protein", "Protein", "g", 0.0, 200.0, 1.0, 20.0),
            ParamDef::new("fat", "Fat", "g", 0.0, 200.0, 1.0, 10.0),
        ];
        let mut provided = BTreeMap::new();
        provided.insert("fat".to_string(), 35.0);
        provided.insert("unrelated".to_string(), 1.0);
        let resolved = resolve_params(&defs, &provided);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["protein"], 20.0);
        assert_eq!(resolved["fat"], 35.0);
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let def = ParamDef::new("mg", "Dose", "mg", 0.0, 10.0, 1.0, 50.0);
        assert!(def.validate("x").is_err());
    }
}
