//! Pharmacokinetic and pharmacodynamic tests
//!
//! Tests verify that:
//! - One-compartment curves peak at the authored time to peak
//! - Saturated Michaelis-Menten elimination is zero order
//! - Hill occupancy and Ki conversion follow their closed forms
//! - Signal response grows with dose

use physio_simulator::pharmacology::{
    effect_site_curve, hill_fraction, PkSpec, Potency, VolumeOfDistribution,
};
use physio_simulator::simulation::SimulationOptions;
use physio_simulator::{
    SignalKey, SimulationEngine, SimulationGrid, SimulationRequest, Subject, TimelineItem,
};

fn minutes(until: usize) -> Vec<f64> {
    (0..=until).map(|t| t as f64).collect()
}

// ============================================================================
// Pharmacokinetics
// ============================================================================

/// Oral caffeine peaks near 45 minutes and declines with a 5 hour half-life
#[test]
fn test_one_compartment_peak_and_half_life() {
    let pk = PkSpec::one_compartment(0.99, 300.0, 45.0, VolumeOfDistribution::PerKg { l_per_kg: 0.6 })
        .compile("caffeine")
        .unwrap();
    let subject = Subject::default();
    let offsets = minutes(1500);
    let curve = pk.exposure_curve(100.0, 5.0, &subject, &offsets, 1.0);

    let (peak_min, peak) = curve
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::MIN), |best, (i, c)| if c > best.1 { (i, c) } else { best });
    assert!((44..=46).contains(&peak_min), "peak at {} min, expected ~45", peak_min);

    // 99 mg over 45 L cannot exceed 2.2 mg/L
    assert!(peak > 1.5 && peak < 2.2, "peak concentration {} mg/L", peak);

    // Terminal phase: one half-life apart halves the concentration
    let ratio = curve[1500] / curve[1200];
    assert!((ratio - 0.5).abs() < 0.01, "terminal ratio {} (expected 0.5)", ratio);
}

/// Exposure scales linearly with dose for first-order kinetics
#[test]
fn test_one_compartment_is_dose_linear() {
    let pk = PkSpec::one_compartment(1.0, 120.0, 30.0, VolumeOfDistribution::Fixed { liters: 40.0 })
        .compile("x")
        .unwrap();
    let subject = Subject::default();
    let offsets = minutes(300);
    let single = pk.exposure_curve(50.0, 1.0, &subject, &offsets, 1.0);
    let double = pk.exposure_curve(100.0, 1.0, &subject, &offsets, 1.0);

    for (t, (a, b)) in single.iter().zip(&double).enumerate() {
        assert!((2.0 * a - b).abs() < 1e-12, "t={}: 2 x {} != {}", t, a, b);
    }
    assert_eq!(single[0], 0.0, "no exposure at dose time");
}

/// Far above Km, concentration falls by Vmax per minute
#[test]
fn test_saturated_elimination_is_zero_order() {
    let vmax = 0.5;
    let pk = PkSpec::michaelis_menten(1.0, vmax, 0.01, VolumeOfDistribution::Fixed { liters: 10.0 })
        .compile("ethanol")
        .unwrap();
    let offsets = minutes(120);
    let curve = pk.exposure_curve(1000.0, 30.0, &Subject::default(), &offsets, 1.0);

    let decline = curve[50] - curve[90];
    assert!(
        (decline - 40.0 * vmax).abs() < 0.2,
        "decline over 40 min = {} (expected {})",
        decline,
        40.0 * vmax
    );
    assert!(curve.iter().all(|c| c.is_finite() && *c >= 0.0));
}

/// Activity rises toward its level while active and decays afterwards
#[test]
fn test_activity_envelope() {
    let pk = PkSpec::activity(5.0, 10.0).compile("exercise").unwrap();
    let offsets = minutes(120);
    let curve = pk.exposure_curve(0.8, 60.0, &Subject::default(), &offsets, 1.0);

    assert!((curve[60] - 0.8).abs() < 1e-3, "level at end = {}", curve[60]);
    let expected = curve[60] * (-1.0f64).exp();
    assert!((curve[70] - expected).abs() < 1e-9, "after one off-tau {} vs {}", curve[70], expected);
}

/// Volume rules scale with the subject
#[test]
fn test_volume_rules() {
    let subject = Subject::default();
    let per_kg = VolumeOfDistribution::PerKg { l_per_kg: 0.6 }.liters(&subject);
    assert!((per_kg - 45.0).abs() < 1e-9, "0.6 L/kg x 75 kg = {}", per_kg);

    let water = VolumeOfDistribution::TotalBodyWater { fraction: 1.0 }.liters(&subject);
    assert!((water - subject.total_body_water_L()).abs() < 1e-12);
}

// ============================================================================
// Pharmacodynamics
// ============================================================================

/// Half occupancy at the half-maximal concentration; steeper with Hill > 1
#[test]
fn test_hill_occupancy() {
    assert!((hill_fraction(2.0, 2.0, 1.0) - 0.5).abs() < 1e-12);
    assert!((hill_fraction(2.0, 2.0, 3.0) - 0.5).abs() < 1e-12);
    assert!(hill_fraction(4.0, 2.0, 3.0) > hill_fraction(4.0, 2.0, 1.0));
    assert_eq!(hill_fraction(0.0, 2.0, 1.0), 0.0);
    assert_eq!(hill_fraction(f64::NAN, 2.0, 1.0), 0.0);
}

/// Ki in nM converts to mg/L through the molecular weight
#[test]
fn test_ki_conversion() {
    let ki = Potency::KiNm(12_000.0);
    let half_max = ki.in_exposure_units(Some(194.19)).unwrap();
    // 12 uM x 194.19 g/mol = 2.33 mg/L
    assert!((half_max - 2.33028).abs() < 1e-5, "half max = {}", half_max);
    assert!(ki.in_exposure_units(None).is_none());
    assert_eq!(Potency::Ec50(0.4).in_exposure_units(None), Some(0.4));
}

/// The effect site lags plasma and never overshoots it on the rise
#[test]
fn test_effect_site_lags_plasma() {
    let plasma = vec![1.0; 60];
    let site = effect_site_curve(&plasma, 15.0, 1.0);
    assert!(site[0] < 1.0 && site[0] > 0.0);
    assert!(site.windows(2).all(|w| w[1] >= w[0]));
    let expected = 1.0 - (-60.0f64 / 15.0).exp();
    assert!((site[59] - expected).abs() < 1e-9, "site[59] = {} (expected {})", site[59], expected);

    assert_eq!(effect_site_curve(&plasma, 0.0, 1.0), plasma, "zero tau passes plasma through");
}

// ============================================================================
// Dose-response through the engine
// ============================================================================

/// Peak caffeine-driven norepinephrine production strictly increases with dose
#[test]
fn test_caffeine_dose_monotonicity() {
    let engine = SimulationEngine::builtin().unwrap();
    let grid = SimulationGrid::default();

    let peaks: Vec<f64> = [50.0, 100.0, 200.0, 400.0]
        .iter()
        .map(|&mg| {
            let item = TimelineItem::at_minutes("c", "caffeine", grid.origin, 480.0, 5.0).with_param("mg", mg);
            let request = SimulationRequest::new(grid.clone(), vec![item]).with_options(SimulationOptions {
                record_production: true,
                ..SimulationOptions::default()
            });
            let response = engine.compute(&request);
            response.production[&SignalKey::Norepinephrine]
                .peak()
                .map(|(_, v)| v)
                .unwrap_or(0.0)
        })
        .collect();

    assert!(peaks[0] > 0.0, "50 mg should drive norepinephrine, got {}", peaks[0]);
    for pair in peaks.windows(2) {
        assert!(pair[1] > pair[0], "production peaks not increasing: {:?}", peaks);
    }
}
