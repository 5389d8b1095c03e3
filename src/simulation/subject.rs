//! Subject description: anthropometrics, sex, menstrual cycle and conditions.

use serde::{Deserialize, Serialize};

use super::grid::MINUTES_PER_DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Sex {
    Male,
    Female,
}

/// Menstrual cycle position, anchored at the grid origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenstrualCycle {
    pub length_days: f64,
    /// Cycle day (0-based) at the grid origin
    pub day_at_origin: f64,
}

/// A condition applied to the subject, by registry name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionSpec {
    pub key: String,
    /// 0.0 = absent, 1.0 = typical presentation
    #[serde(default = "default_severity")]
    pub severity: f64,
}

fn default_severity() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub sex: Sex,
    pub age_years: f64,
    pub weight_kg: f64,
    pub height_cm: f64,
    #[serde(default)]
    pub cycle: Option<MenstrualCycle>,
    #[serde(default)]
    pub conditions: Vec<ConditionSpec>,
}

impl Default for Subject {
    fn default() -> Self {
        Self {
            sex: Sex::Male,
            age_years: 35.0,
            weight_kg: 75.0,
            height_cm: 178.0,
            cycle: None,
            conditions: Vec::new(),
        }
    }
}

impl Subject {
    /// Cycle day and cycle length at a time since the grid origin.
    pub fn cycle_position(&self, minutes_since_origin: f64) -> Option<(f64, f64)> {
        if self.sex != Sex::Female {
            return None;
        }
        self.cycle.map(|cycle| {
            let length = cycle.length_days.max(1.0);
            let day = (cycle.day_at_origin + minutes_since_origin / MINUTES_PER_DAY).rem_euclid(length);
            (day, length)
        })
    }

    /// Watson total body water (liters).
    ///
    /// Reference: Watson PE et al. Am J Clin Nutr. 1980;33:27-39
    pub fn total_body_water_L(&self) -> f64 {
        let tbw = match self.sex {
            Sex::Male => 2.447 - 0.09516 * self.age_years + 0.1074 * self.height_cm + 0.3362 * self.weight_kg,
            Sex::Female => -2.097 + 0.1069 * self.height_cm + 0.2466 * self.weight_kg,
        };
        tbw.max(1.0)
    }

    /// Boer lean body mass (kg).
    ///
    /// Reference: Boer P. Am J Physiol. 1984;247:F632-F636
    pub fn lean_body_mass_kg(&self) -> f64 {
        let lbm = match self.sex {
            Sex::Male => 0.407 * self.weight_kg + 0.267 * self.height_cm - 19.2,
            Sex::Female => 0.252 * self.weight_kg + 0.473 * self.height_cm - 48.3,
        };
        lbm.clamp(1.0, self.weight_kg.max(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_subject_body_composition() {
        let subject = Subject::default();
        let tbw = subject.total_body_water_L();
        // 2.447 - 3.3306 + 19.1172 + 25.215
        assert!((tbw - 43.4486).abs() < 1e-3, "TBW = {}", tbw);
        let lbm = subject.lean_body_mass_kg();
        assert!((lbm - 58.851).abs() < 1e-3, "LBM = {}", lbm);
    }

    #[test]
    fn test_cycle_only_for_female() {
        let mut subject = Subject {
            cycle: Some(MenstrualCycle {
                length_days: 28.0,
                day_at_origin: 27.0,
            }),
            ..Subject::default()
        };
        assert!(subject.cycle_position(0.0).is_none());
        subject.sex = Sex::Female;
        let (day, length) = subject.cycle_position(2.0 * MINUTES_PER_DAY).unwrap();
        assert_eq!(length, 28.0);
        assert!((day - 1.0).abs() < 1e-12, "day = {}", day);
    }
}
