//! Pharmacokinetic models.
//!
//! Exposure is plasma concentration in mg/L for molecules, or a unitless
//! activity level for behavioural interventions (exercise, sleep, light).
//!
//! References:
//! - Rowland M, Tozer TN. Clinical Pharmacokinetics, 4th ed. 2011 (one-compartment)
//! - Norberg A et al. Clin Pharmacokinet. 2003;42:1-31 (ethanol Michaelis-Menten)

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::simulation::integrator::{IntegratorConfig, RK4Integrator};
use crate::simulation::{Sex, Subject};

/// Minimum zero-order input duration for saturable models (minutes).
pub const MIN_INPUT_DURATION_MIN: f64 = 30.0;

/// Rule for the apparent volume of distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum VolumeOfDistribution {
    #[serde(rename_all = "camelCase")]
    PerKg { l_per_kg: f64 },
    /// Fraction of Watson total body water
    #[serde(rename_all = "camelCase")]
    TotalBodyWater { fraction: f64 },
    /// Liters per kg of Boer lean body mass
    #[serde(rename_all = "camelCase")]
    LeanBodyMass { l_per_kg: f64 },
    #[serde(rename_all = "camelCase")]
    SexAdjusted { male_l_per_kg: f64, female_l_per_kg: f64 },
    #[serde(rename_all = "camelCase")]
    Fixed { liters: f64 },
}

impl VolumeOfDistribution {
    /// Volume in liters for a subject.
    pub fn liters(&self, subject: &Subject) -> f64 {
        let volume = match *self {
            VolumeOfDistribution::PerKg { l_per_kg } => l_per_kg * subject.weight_kg,
            VolumeOfDistribution::TotalBodyWater { fraction } => fraction * subject.total_body_water_L(),
            VolumeOfDistribution::LeanBodyMass { l_per_kg } => l_per_kg * subject.lean_body_mass_kg(),
            VolumeOfDistribution::SexAdjusted {
                male_l_per_kg,
                female_l_per_kg,
            } => match subject.sex {
                Sex::Male => male_l_per_kg * subject.weight_kg,
                Sex::Female => female_l_per_kg * subject.weight_kg,
            },
            VolumeOfDistribution::Fixed { liters } => liters,
        };
        volume.max(0.1)
    }

    fn is_valid(&self) -> bool {
        let values: &[f64] = match self {
            VolumeOfDistribution::PerKg { l_per_kg } => &[*l_per_kg],
            VolumeOfDistribution::TotalBodyWater { fraction } => &[*fraction],
            VolumeOfDistribution::LeanBodyMass { l_per_kg } => &[*l_per_kg],
            VolumeOfDistribution::SexAdjusted {
                male_l_per_kg,
                female_l_per_kg,
            } => &[*male_l_per_kg, *female_l_per_kg],
            VolumeOfDistribution::Fixed { liters } => &[*liters],
        };
        values.iter().all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Compiled pharmacokinetic model.
#[derive(Debug, Clone, PartialEq)]
pub enum PkModel {
    /// First-order absorption and elimination.
    OneCompartment {
        bioavailability: f64,
        absorption_rate_per_min: f64,
        elimination_rate_per_min: f64,
        volume: VolumeOfDistribution,
    },
    /// Zero-order input, saturable elimination.
    MichaelisMenten {
        bioavailability: f64,
        vmax_mg_per_L_per_min: f64,
        km_mg_per_L: f64,
        volume: VolumeOfDistribution,
    },
    /// Activity level with exponential on/off kinetics.
    ActivityDependent { on_tau_min: f64, off_tau_min: f64 },
}

/// Raw PK block as authored in catalog data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PkSpec {
    /// "oneCompartment", "michaelisMenten" or "activityDependent"
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bioavailability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_life_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_peak_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorption_rate_per_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmax_mg_per_L_per_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km_mg_per_L: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_tau_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_tau_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeOfDistribution>,
}

impl PkSpec {
    pub fn one_compartment(
        bioavailability: f64,
        half_life_min: f64,
        time_to_peak_min: f64,
        volume: VolumeOfDistribution,
    ) -> Self {
        Self {
            model: "oneCompartment".to_string(),
            bioavailability: Some(bioavailability),
            half_life_min: Some(half_life_min),
            time_to_peak_min: Some(time_to_peak_min),
            volume: Some(volume),
            ..Self::default()
        }
    }

    pub fn michaelis_menten(
        bioavailability: f64,
        vmax_mg_per_L_per_min: f64,
        km_mg_per_L: f64,
        volume: VolumeOfDistribution,
    ) -> Self {
        Self {
            model: "michaelisMenten".to_string(),
            bioavailability: Some(bioavailability),
            vmax_mg_per_L_per_min: Some(vmax_mg_per_L_per_min),
            km_mg_per_L: Some(km_mg_per_L),
            volume: Some(volume),
            ..Self::default()
        }
    }

    pub fn activity(on_tau_min: f64, off_tau_min: f64) -> Self {
        Self {
            model: "activityDependent".to_string(),
            on_tau_min: Some(on_tau_min),
            off_tau_min: Some(off_tau_min),
            ..Self::default()
        }
    }

    /// Validate and compile into a [`PkModel`].
    pub fn compile(&self, intervention: &str) -> Result<PkModel, ConfigurationError> {
        let malformed = |reason: String| ConfigurationError::MalformedPk {
            intervention: intervention.to_string(),
            reason,
        };
        let require = |value: Option<f64>, field: &'static str| -> Result<f64, ConfigurationError> {
            let value = value.ok_or_else(|| ConfigurationError::MissingPkField {
                intervention: intervention.to_string(),
                field,
            })?;
            if !value.is_finite() || value <= 0.0 {
                return Err(malformed(format!("{} must be positive, got {}", field, value)));
            }
            Ok(value)
        };
        let volume = |volume: Option<VolumeOfDistribution>| -> Result<VolumeOfDistribution, ConfigurationError> {
            let volume = volume.ok_or_else(|| ConfigurationError::MissingPkField {
                intervention: intervention.to_string(),
                field: "volume",
            })?;
            if !volume.is_valid() {
                return Err(malformed("volume of distribution must be positive".to_string()));
            }
            Ok(volume)
        };
        let bioavailability = |value: Option<f64>| -> Result<f64, ConfigurationError> {
            let f = value.unwrap_or(1.0);
            if !(f > 0.0 && f <= 1.0) {
                return Err(malformed(format!("bioavailability {} outside (0, 1]", f)));
            }
            Ok(f)
        };

        match self.model.as_str() {
            "oneCompartment" => {
                let half_life = require(self.half_life_min, "halfLifeMin")?;
                let ke = std::f64::consts::LN_2 / half_life;
                let ka = match (self.absorption_rate_per_min, self.time_to_peak_min) {
                    (Some(ka), _) => require(Some(ka), "absorptionRatePerMin")?,
                    (None, Some(tmax)) => {
                        let tmax = require(Some(tmax), "timeToPeakMin")?;
                        absorption_rate_for_peak(ke, tmax).ok_or_else(|| {
                            malformed(format!(
                                "time to peak {} min is unreachable with half-life {} min",
                                tmax, half_life
                            ))
                        })?
                    }
                    (None, None) => {
                        return Err(ConfigurationError::MissingPkField {
                            intervention: intervention.to_string(),
                            field: "absorptionRatePerMin",
                        })
                    }
                };
                Ok(PkModel::OneCompartment {
                    bioavailability: bioavailability(self.bioavailability)?,
                    absorption_rate_per_min: ka,
                    elimination_rate_per_min: ke,
                    volume: volume(self.volume)?,
                })
            }
            "michaelisMenten" => Ok(PkModel::MichaelisMenten {
                bioavailability: bioavailability(self.bioavailability)?,
                vmax_mg_per_L_per_min: require(self.vmax_mg_per_L_per_min, "vmaxMgPerLPerMin")?,
                km_mg_per_L: require(self.km_mg_per_L, "kmMgPerL")?,
                volume: volume(self.volume)?,
            }),
            "activityDependent" => Ok(PkModel::ActivityDependent {
                on_tau_min: require(self.on_tau_min, "onTauMin")?,
                off_tau_min: require(self.off_tau_min, "offTauMin")?,
            }),
            other => Err(malformed(format!("unknown model '{}'", other))),
        }
    }
}

/// Absorption rate giving peak concentration at `tmax_min` for elimination rate `ke`.
///
/// Solves tmax = ln(ka/ke) / (ka - ke) for ka > ke by bisection. The right-hand
/// side decreases from 1/ke (as ka approaches ke) toward zero, so a solution
/// exists only for tmax < 1/ke.
pub fn absorption_rate_for_peak(ke: f64, tmax_min: f64) -> Option<f64> {
    if !(ke > 0.0 && tmax_min > 0.0) || tmax_min >= 1.0 / ke {
        return None;
    }
    let peak_time = |ka: f64| (ka / ke).ln() / (ka - ke);

    let mut lo = ke * (1.0 + 1e-9);
    let mut hi = ke * 2.0;
    while peak_time(hi) > tmax_min {
        hi *= 2.0;
        if hi > 1e6 {
            return None;
        }
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if peak_time(mid) > tmax_min {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// One-compartment concentration at `t_min` after an oral dose.
pub fn one_compartment_concentration(dose_over_volume: f64, ka: f64, ke: f64, t_min: f64) -> f64 {
    if t_min <= 0.0 {
        return 0.0;
    }
    if (ka - ke).abs() < 1e-9 * ka.max(ke) {
        // Limit ka -> ke
        return dose_over_volume * ka * t_min * (-ke * t_min).exp();
    }
    dose_over_volume * ka / (ka - ke) * ((-ke * t_min).exp() - (-ka * t_min).exp())
}

/// Activity envelope: exponential rise while active, exponential decay after.
pub fn activity_envelope(t_min: f64, duration_min: f64, on_tau_min: f64, off_tau_min: f64) -> f64 {
    if t_min < 0.0 {
        return 0.0;
    }
    let rise = |t: f64| 1.0 - (-t / on_tau_min).exp();
    if t_min <= duration_min {
        rise(t_min)
    } else {
        rise(duration_min) * (-(t_min - duration_min) / off_tau_min).exp()
    }
}

impl PkModel {
    /// Exposure at each of `offsets_min` (minutes since dose start, ascending).
    ///
    /// `amount` is the dose in mg for molecules and the activity level for
    /// activity-dependent models. `substep_min` bounds the RK4 step of
    /// saturable models.
    pub fn exposure_curve(
        &self,
        amount: f64,
        duration_min: f64,
        subject: &Subject,
        offsets_min: &[f64],
        substep_min: f64,
    ) -> Vec<f64> {
        match *self {
            PkModel::OneCompartment {
                bioavailability,
                absorption_rate_per_min,
                elimination_rate_per_min,
                volume,
            } => {
                let dose_over_volume = bioavailability * amount / volume.liters(subject);
                offsets_min
                    .iter()
                    .map(|&t| {
                        one_compartment_concentration(
                            dose_over_volume,
                            absorption_rate_per_min,
                            elimination_rate_per_min,
                            t,
                        )
                    })
                    .collect()
            }
            PkModel::MichaelisMenten {
                bioavailability,
                vmax_mg_per_L_per_min,
                km_mg_per_L,
                volume,
            } => {
                let input_duration = duration_min.max(MIN_INPUT_DURATION_MIN);
                let input_rate = bioavailability * amount / volume.liters(subject) / input_duration;
                let mut integrator = RK4Integrator::new(
                    1,
                    IntegratorConfig {
                        dt_min: substep_min,
                        ..IntegratorConfig::default()
                    },
                );
                let mut c = [0.0];
                let derivatives = |t: f64, state: &[f64], dcdt: &mut [f64]| {
                    let input = if (0.0..input_duration).contains(&t) { input_rate } else { 0.0 };
                    let conc = state[0].max(0.0);
                    dcdt[0] = input - vmax_mg_per_L_per_min * conc / (km_mg_per_L + conc);
                };
                offsets_min
                    .iter()
                    .map(|&t| {
                        if t <= 0.0 {
                            return 0.0;
                        }
                        // Break at the end of input so the kink is not smeared
                        if integrator.time_min < input_duration && t > input_duration {
                            integrator.advance_to(input_duration, &mut c, derivatives);
                        }
                        integrator.advance_to(t, &mut c, derivatives);
                        c[0]
                    })
                    .collect()
            }
            PkModel::ActivityDependent {
                on_tau_min,
                off_tau_min,
            } => offsets_min
                .iter()
                .map(|&t| amount * activity_envelope(t, duration_min, on_tau_min, off_tau_min))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorption_rate_reproduces_peak_time() {
        let ke = std::f64::consts::LN_2 / 300.0;
        let ka = absorption_rate_for_peak(ke, 45.0).unwrap();
        let tmax = (ka / ke).ln() / (ka - ke);
        assert!((tmax - 45.0).abs() < 1e-6, "tmax = {}", tmax);
        assert!(ka > ke);
    }

    #[test]
    fn test_unreachable_peak_rejected() {
        let ke = 0.01;
        assert!(absorption_rate_for_peak(ke, 150.0).is_none());
        let spec = PkSpec::one_compartment(1.0, 69.0, 150.0, VolumeOfDistribution::PerKg { l_per_kg: 1.0 });
        assert!(matches!(spec.compile("x"), Err(ConfigurationError::MalformedPk { .. })));
    }

    #[test]
    fn test_missing_field_reported() {
        let spec = PkSpec {
            model: "michaelisMenten".to_string(),
            bioavailability: Some(0.8),
            km_mg_per_L: Some(80.0),
            volume: Some(VolumeOfDistribution::Fixed { liters: 40.0 }),
            ..PkSpec::default()
        };
        assert_eq!(
            spec.compile("alcohol"),
            Err(ConfigurationError::MissingPkField {
                intervention: "alcohol".to_string(),
                field: "vmaxMgPerLPerMin",
            })
        );
    }

    #[test]
    fn test_one_compartment_limit_is_continuous() {
        let near = one_compartment_concentration(1.0, 0.0100001, 0.01, 50.0);
        let limit = one_compartment_concentration(1.0, 0.01, 0.01, 50.0);
        assert!((near - limit).abs() < 1e-5, "{} vs {}", near, limit);
    }

    #[test]
    fn test_michaelis_menten_rises_then_clears() {
        let model = PkSpec::michaelis_menten(0.8, 2.5, 80.0, VolumeOfDistribution::Fixed { liters: 50.0 })
            .compile("alcohol")
            .unwrap();
        let offsets: Vec<f64> = (0..=120).map(|i| i as f64 * 5.0).collect();
        let curve = model.exposure_curve(28000.0, 30.0, &Subject::default(), &offsets, 1.0);
        let peak = curve.iter().cloned().fold(0.0, f64::max);
        // 0.8 * 28000 / 50 = 448 mg/L delivered over 30 minutes
        assert!(peak > 300.0 && peak < 448.0, "peak = {}", peak);
        assert!(curve[0] == 0.0);
        assert!(*curve.last().unwrap() < 1.0, "end = {}", curve.last().unwrap());
    }

    #[test]
    fn test_activity_envelope() {
        assert_eq!(activity_envelope(-1.0, 60.0, 5.0, 10.0), 0.0);
        assert!(activity_envelope(60.0, 60.0, 5.0, 10.0) > 0.99);
        let after = activity_envelope(70.0, 60.0, 5.0, 10.0);
        assert!((after - activity_envelope(60.0, 60.0, 5.0, 10.0) * (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_volume_rules() {
        let subject = Subject::default();
        let tbw = VolumeOfDistribution::TotalBodyWater { fraction: 1.0 }.liters(&subject);
        assert!((tbw - subject.total_body_water_L()).abs() < 1e-12);
        let fixed = VolumeOfDistribution::Fixed { liters: 12.0 }.liters(&subject);
        assert_eq!(fixed, 12.0);
    }
}
