//! Built-in intervention catalog.
//!
//! PK constants are typical adult oral values; Ki values are human receptor
//! binding affinities.
//!
//! References:
//! - Fredholm BB et al. Pharmacol Rev. 1999;51:83-133 (caffeine)
//! - Jones AW. Forensic Sci Rev. 2010;22:91-113 (ethanol)
//! - Benowitz NL et al. Handb Exp Pharmacol. 2009;192:29-60 (nicotine)
//! - DeVane CL et al. Clin Pharmacokinet. 2002;41:1247-1266 (sertraline)
//! - Robertson P, Hellriegel ET. Clin Pharmacokinet. 2003;42:123-137 (modafinil)
//! - Dahlin E et al. Diabetologia. 1997;40:1061-1068 (mixed meal glucose kinetics)

use crate::pharmacology::{DirectEffect, DirectKind, Mechanism, PdSpec, PkSpec, Potency, VolumeOfDistribution};
use crate::signals::SignalKey::{self, *};

use super::catalog::{
    DoseRule, GastricDelay, InterventionSpec, MoleculeProfile, NutrientEffect, NutritionSpec, PharmacologySpec,
    ProfileSpec,
};
use super::params::ParamDef;

/// Grams of ethanol per standard drink, in mg.
pub const STANDARD_DRINK_MG: f64 = 14_000.0;

fn dose_param(max: f64, step: f64, default: f64) -> ParamDef {
    ParamDef::new("mg", "Dose", "mg", 0.0, max, step, default)
}

fn drug(
    key: &str,
    label: &str,
    param: ParamDef,
    molecular_weight: f64,
    pk: PkSpec,
    pd: Vec<PdSpec>,
    direct: Vec<DirectEffect>,
) -> InterventionSpec {
    let dose = DoseRule {
        param: param.key.clone(),
        per_unit: 1.0,
    };
    InterventionSpec {
        key: key.to_string(),
        label: label.to_string(),
        icon: "pill".to_string(),
        default_duration_min: 5.0,
        params: vec![param],
        profile: ProfileSpec::Pharmacology(PharmacologySpec {
            molecule: Some(MoleculeProfile {
                name: label.to_lowercase(),
                molecular_weight_g_per_mol: molecular_weight,
            }),
            dose,
            pk,
            pd,
            direct,
        }),
    }
}

#[allow(clippy::too_many_arguments)]
fn activity(
    key: &str,
    label: &str,
    icon: &str,
    default_duration_min: f64,
    param: ParamDef,
    per_unit: f64,
    on_off_tau_min: (f64, f64),
    direct: &[(SignalKey, f64, f64)],
    clearance: &[(SignalKey, f64)],
) -> InterventionSpec {
    let mut effects: Vec<DirectEffect> = direct
        .iter()
        .map(|&(signal, gain, exponent)| DirectEffect::drive(signal, gain, exponent))
        .collect();
    effects.extend(
        clearance
            .iter()
            .map(|&(signal, gain)| DirectEffect::clearance(signal, gain, 1.0)),
    );
    InterventionSpec {
        key: key.to_string(),
        label: label.to_string(),
        icon: icon.to_string(),
        default_duration_min,
        profile: ProfileSpec::Pharmacology(PharmacologySpec {
            molecule: None,
            dose: DoseRule {
                param: param.key.clone(),
                per_unit,
            },
            pk: PkSpec::activity(on_off_tau_min.0, on_off_tau_min.1),
            pd: Vec::new(),
            direct: effects,
        }),
        params: vec![param],
    }
}

fn food() -> InterventionSpec {
    InterventionSpec {
        key: "food".to_string(),
        label: "Meal".to_string(),
        icon: "utensils".to_string(),
        default_duration_min: 20.0,
        params: vec![
            ParamDef::new("carbSugar", "Sugars", "g", 0.0, 150.0, 1.0, 15.0),
            ParamDef::new("carbStarch", "Starch", "g", 0.0, 200.0, 1.0, 30.0),
            ParamDef::new("protein", "Protein", "g", 0.0, 150.0, 1.0, 20.0),
            ParamDef::new("fat", "Fat", "g", 0.0, 150.0, 1.0, 10.0),
            ParamDef::new("fiber", "Fiber", "g", 0.0, 60.0, 1.0, 5.0),
        ],
        profile: ProfileSpec::Nutrition(NutritionSpec {
            gastric_delay: GastricDelay {
                base_min: 10.0,
                fat_param: "fat".to_string(),
                per_fat_g_min: 0.3,
                fiber_param: "fiber".to_string(),
                per_fiber_g_min: 0.4,
                max_min: 45.0,
            },
            rise_window_min: 90.0,
            effects: vec![
                NutrientEffect::new(&["carbSugar"], Glucose, DirectKind::Drive, 0.08, 20.0),
                NutrientEffect::new(&["carbStarch"], Glucose, DirectKind::Drive, 0.04, 45.0),
                NutrientEffect::new(&["protein"], Glucagon, DirectKind::Drive, 0.1, 60.0),
                NutrientEffect::new(&["protein"], Insulin, DirectKind::Drive, 0.02, 45.0),
                NutrientEffect::new(
                    &["carbSugar", "carbStarch", "protein", "fat"],
                    Ghrelin,
                    DirectKind::Clearance,
                    0.01,
                    45.0,
                ),
                NutrientEffect::new(&["carbSugar", "carbStarch"], Serotonin, DirectKind::Drive, 0.01, 90.0),
                NutrientEffect::new(&["protein"], Dopamine, DirectKind::Drive, 0.01, 90.0),
            ],
        }),
    }
}

/// Specs for every built-in intervention.
pub fn builtin_specs() -> Vec<InterventionSpec> {
    let per_kg = |l_per_kg: f64| VolumeOfDistribution::PerKg { l_per_kg };

    vec![
        food(),
        // ====================================================================
        // Behavioural
        // ====================================================================
        activity(
            "exercise",
            "Exercise",
            "running",
            45.0,
            ParamDef::new("intensity", "Intensity", "", 0.0, 1.0, 0.05, 0.6),
            1.0,
            (5.0, 10.0),
            &[
                (Adrenaline, 50.0, 1.5),
                (Norepinephrine, 100.0, 1.2),
                (HeartRate, 20.0, 1.0),
                (VagalTone, -4.0, 1.0),
                (Lactate, 0.5, 2.5),
                (Cortisol, 0.2, 2.0),
                (Endorphin, 3.0, 2.0),
                (Bdnf, 0.3, 1.0),
                (Il6, 0.05, 1.5),
                (Dopamine, 1.0, 1.0),
                (Adenosine, 0.3, 1.0),
                (GrowthHormone, 0.2, 2.0),
            ],
            &[(Glucose, 1.0)],
        ),
        activity(
            "sleep",
            "Sleep",
            "moon",
            480.0,
            ParamDef::new("quality", "Quality", "", 0.0, 1.0, 0.05, 0.85),
            1.0,
            (20.0, 10.0),
            &[
                (Adenosine, -0.5, 1.0),
                (GrowthHormone, 0.2, 1.0),
                (Cortisol, -0.03, 1.0),
                (Orexin, -1.0, 1.0),
                (Histamine, -1.5, 1.0),
                (HeartRate, -3.0, 1.0),
                (VagalTone, 3.0, 1.0),
                (Adrenaline, -3.0, 1.0),
                (Norepinephrine, -20.0, 1.0),
                (Gaba, 0.5, 1.0),
                (Acetylcholine, -1.0, 1.0),
                (Glutamate, -0.5, 1.0),
            ],
            &[(Adenosine, 3.0)],
        ),
        activity(
            "meditation",
            "Meditation",
            "lotus",
            20.0,
            ParamDef::new("depth", "Depth", "", 0.0, 1.0, 0.05, 0.8),
            1.0,
            (5.0, 15.0),
            &[
                (VagalTone, 4.0, 1.0),
                (Cortisol, -0.05, 1.0),
                (Adrenaline, -2.0, 1.0),
                (Norepinephrine, -10.0, 1.0),
                (Gaba, 0.5, 1.0),
                (Serotonin, 0.4, 1.0),
                (HeartRate, -2.0, 1.0),
                (Dopamine, 0.5, 1.0),
            ],
            &[],
        ),
        activity(
            "sunlight",
            "Sunlight",
            "sun",
            30.0,
            ParamDef::new("lux", "Illuminance", "lux", 0.0, 100_000.0, 1000.0, 10_000.0),
            1.0e-4,
            (5.0, 20.0),
            &[
                (Cortisol, 0.03, 1.0),
                (Serotonin, 0.5, 1.0),
                (Orexin, 0.5, 1.0),
                (Dopamine, 0.3, 1.0),
            ],
            &[(Melatonin, 4.0)],
        ),
        activity(
            "coldExposure",
            "Cold exposure",
            "snowflake",
            3.0,
            ParamDef::new("intensity", "Intensity", "", 0.0, 1.0, 0.05, 0.5),
            1.0,
            (1.0, 20.0),
            &[
                (Norepinephrine, 150.0, 1.0),
                (Dopamine, 8.0, 1.0),
                (Adrenaline, 30.0, 1.0),
                (HeartRate, 10.0, 1.0),
                (VagalTone, -2.0, 1.0),
            ],
            &[],
        ),
        // ====================================================================
        // Molecules
        // ====================================================================
        drug(
            "caffeine",
            "Caffeine",
            dose_param(600.0, 10.0, 100.0),
            194.19,
            PkSpec::one_compartment(0.99, 300.0, 45.0, per_kg(0.6)),
            vec![
                PdSpec::new("A1", Mechanism::Antagonist, Potency::KiNm(12_000.0), 1.0).with_onset(15.0),
                PdSpec::new("A2A", Mechanism::Antagonist, Potency::KiNm(2_400.0), 1.0).with_onset(15.0),
            ],
            vec![],
        ),
        InterventionSpec {
            key: "alcohol".to_string(),
            label: "Alcohol".to_string(),
            icon: "wine".to_string(),
            default_duration_min: 30.0,
            params: vec![ParamDef::new("drinks", "Standard drinks", "drinks", 0.0, 10.0, 0.5, 1.0)],
            profile: ProfileSpec::Pharmacology(PharmacologySpec {
                molecule: Some(MoleculeProfile {
                    name: "ethanol".to_string(),
                    molecular_weight_g_per_mol: 46.07,
                }),
                dose: DoseRule {
                    param: "drinks".to_string(),
                    per_unit: STANDARD_DRINK_MG,
                },
                pk: PkSpec::michaelis_menten(
                    0.8,
                    2.5,
                    80.0,
                    VolumeOfDistribution::TotalBodyWater { fraction: 1.15 },
                ),
                pd: vec![
                    PdSpec::new("GABA_A", Mechanism::Pam, Potency::Ec50(400.0), 3.0)
                        .with_hill(1.5)
                        .with_onset(10.0)
                        .with_cooperativity(3.0),
                    PdSpec::new("NMDA", Mechanism::Antagonist, Potency::Ec50(1000.0), 1.0).with_onset(10.0),
                    PdSpec::new("MOR", Mechanism::Agonist, Potency::Ec50(800.0), 0.5).with_onset(10.0),
                ],
                direct: vec![],
            }),
        },
        drug(
            "nicotine",
            "Nicotine",
            dose_param(4.0, 0.5, 1.0),
            162.23,
            PkSpec::one_compartment(0.8, 120.0, 8.0, VolumeOfDistribution::LeanBodyMass { l_per_kg: 3.0 }),
            vec![PdSpec::new("NACHR", Mechanism::Agonist, Potency::KiNm(10.0), 1.0).with_onset(3.0)],
            vec![],
        ),
        drug(
            "melatonin",
            "Melatonin",
            dose_param(10.0, 0.5, 3.0),
            232.28,
            PkSpec::one_compartment(0.15, 45.0, 50.0, per_kg(1.2)),
            vec![PdSpec::new("MT1", Mechanism::Agonist, Potency::KiNm(0.1), 1.0).with_onset(20.0)],
            // 1 mg/L is 1e6 pg/mL; drive = exposure x 1e6 / tau
            vec![DirectEffect::drive(Melatonin, 25_000.0, 1.0)],
        ),
        drug(
            "sertraline",
            "Sertraline",
            dose_param(200.0, 25.0, 50.0),
            306.2,
            PkSpec::one_compartment(0.44, 1560.0, 360.0, per_kg(20.0)),
            vec![
                PdSpec::new("SERT", Mechanism::Antagonist, Potency::KiNm(0.29), 0.8).with_onset(60.0),
                PdSpec::new("DAT", Mechanism::Antagonist, Potency::KiNm(25.0), 0.2).with_onset(60.0),
            ],
            vec![],
        ),
        drug(
            "modafinil",
            "Modafinil",
            dose_param(400.0, 50.0, 200.0),
            273.35,
            PkSpec::one_compartment(0.9, 900.0, 150.0, per_kg(0.8)),
            vec![
                PdSpec::new("DAT", Mechanism::Antagonist, Potency::KiNm(3_000.0), 0.6).with_onset(30.0),
                PdSpec::new("NET", Mechanism::Antagonist, Potency::KiNm(35_000.0), 0.3).with_onset(30.0),
            ],
            vec![],
        ),
        drug(
            "dextroamphetamine",
            "Dextroamphetamine",
            dose_param(40.0, 2.5, 10.0),
            135.21,
            PkSpec::one_compartment(0.9, 600.0, 180.0, per_kg(4.0)),
            vec![
                PdSpec::new("DAT", Mechanism::Agonist, Potency::KiNm(34.0), 1.0).with_onset(20.0),
                PdSpec::new("NET", Mechanism::Agonist, Potency::KiNm(39.0), 1.0).with_onset(20.0),
            ],
            vec![],
        ),
        drug(
            "alprazolam",
            "Alprazolam",
            dose_param(2.0, 0.25, 0.5),
            308.76,
            PkSpec::one_compartment(0.9, 660.0, 90.0, per_kg(0.8)),
            vec![PdSpec::new("GABA_A", Mechanism::Pam, Potency::KiNm(4.0), 3.0)
                .with_onset(15.0)
                .with_cooperativity(4.0)],
            vec![],
        ),
        drug(
            "theanine",
            "L-theanine",
            dose_param(400.0, 50.0, 200.0),
            174.2,
            PkSpec::one_compartment(0.5, 70.0, 50.0, per_kg(0.5)),
            vec![
                PdSpec::new("GABA_A", Mechanism::Pam, Potency::Ec50(5.0), 1.0)
                    .with_onset(20.0)
                    .with_cooperativity(1.5),
                PdSpec::new("NMDA", Mechanism::Antagonist, Potency::Ec50(10.0), 0.3).with_onset(20.0),
            ],
            vec![],
        ),
        drug(
            "moclobemide",
            "Moclobemide",
            dose_param(600.0, 75.0, 300.0),
            268.74,
            PkSpec::one_compartment(0.8, 120.0, 60.0, per_kg(1.0)),
            vec![PdSpec::new("MAO_A", Mechanism::Antagonist, Potency::Ec50(1.0), 0.9).with_onset(30.0)],
            vec![],
        ),
        drug(
            "huperzine",
            "Huperzine A",
            dose_param(0.4, 0.05, 0.2),
            242.32,
            PkSpec::one_compartment(0.95, 300.0, 80.0, per_kg(1.5)),
            vec![PdSpec::new("ACHE", Mechanism::Antagonist, Potency::KiNm(20.0), 0.9).with_onset(30.0)],
            vec![],
        ),
        drug(
            "diphenhydramine",
            "Diphenhydramine",
            dose_param(100.0, 12.5, 25.0),
            255.35,
            PkSpec::one_compartment(0.5, 540.0, 120.0, per_kg(4.5)),
            vec![PdSpec::new("H1", Mechanism::Antagonist, Potency::KiNm(16.0), 1.0).with_onset(30.0)],
            vec![],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interventions::InterventionCatalog;
    use crate::pharmacology::TargetRegistry;

    #[test]
    fn test_builtin_catalog_compiles() {
        let targets = TargetRegistry::builtin().unwrap();
        let catalog = InterventionCatalog::builtin(&targets).unwrap();
        assert_eq!(catalog.len(), builtin_specs().len());
        for key in ["food", "caffeine", "alcohol", "exercise", "sleep", "sertraline"] {
            assert!(catalog.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_default_meal_gastric_delay() {
        let spec = food();
        if let ProfileSpec::Nutrition(nutrition) = spec.profile {
            let params = crate::interventions::resolve_params(&spec.params, &Default::default());
            let delay = nutrition.gastric_delay.minutes(&params);
            assert!((delay - 15.0).abs() < 1e-12, "delay = {}", delay);
        } else {
            panic!("food must be a nutrition profile");
        }
    }
}
