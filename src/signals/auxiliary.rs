//! Auxiliary state: receptor and transporter densities, enzyme activities and
//! vesicle reserves.
//!
//! Auxiliaries are dimensionless (1.0 is the unperturbed level). They evolve
//! on the same grid as the signals and feed back into pharmacodynamics and
//! clearance on the next step.

use std::collections::BTreeMap;
use std::fmt;

use crate::pharmacology::{Adaptation, EnzymeKey, ReceptorKey, TargetRegistry, TransporterKey};

/// Neurotransmitter stores drawn on by releasing agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VesicleKey {
    Dopamine,
    Serotonin,
    Norepinephrine,
}

impl VesicleKey {
    pub const ALL: [VesicleKey; 3] = [VesicleKey::Dopamine, VesicleKey::Serotonin, VesicleKey::Norepinephrine];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            VesicleKey::Dopamine => "dopamine",
            VesicleKey::Serotonin => "serotonin",
            VesicleKey::Norepinephrine => "norepinephrine",
        }
    }
}

/// Identifier of an auxiliary state variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuxiliaryKey {
    ReceptorDensity(ReceptorKey),
    TransporterDensity(TransporterKey),
    EnzymeActivity(EnzymeKey),
    VesiclePool(VesicleKey),
}

impl fmt::Display for AuxiliaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuxiliaryKey::ReceptorDensity(key) => write!(f, "density.{}", key.name()),
            AuxiliaryKey::TransporterDensity(key) => write!(f, "density.{}", key.name()),
            AuxiliaryKey::EnzymeActivity(key) => write!(f, "activity.{}", key.name()),
            AuxiliaryKey::VesiclePool(key) => write!(f, "vesicles.{}", key.name()),
        }
    }
}

/// How an auxiliary moves toward its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuxiliaryDynamics {
    /// Occupancy-driven up/down regulation of a receptor or transporter
    Adaptation(Adaptation),
    /// Enzyme activity following inhibition and induction
    Turnover { tau_min: f64 },
    /// Vesicle store refilling against release-driven depletion
    Reserve { refill_tau_min: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuxiliaryDefinition {
    pub key: AuxiliaryKey,
    pub label: String,
    pub baseline: f64,
    pub dynamics: AuxiliaryDynamics,
}

/// Vesicle refill time constant (minutes)
/// Reference: Sulzer D et al. Neuron. 2016;90:1238-1251
pub const VESICLE_REFILL_TAU_MIN: f64 = 240.0;

/// Density bounds relative to baseline.
pub const DENSITY_MIN: f64 = 0.1;
pub const DENSITY_MAX: f64 = 3.0;

/// Build auxiliary definitions for every target in the registry.
pub fn auxiliaries_for(targets: &TargetRegistry) -> BTreeMap<AuxiliaryKey, AuxiliaryDefinition> {
    let mut defs = BTreeMap::new();

    for receptor in targets.receptors() {
        let key = AuxiliaryKey::ReceptorDensity(receptor.key);
        defs.insert(
            key,
            AuxiliaryDefinition {
                key,
                label: format!("{} receptor density", receptor.label),
                baseline: 1.0,
                dynamics: AuxiliaryDynamics::Adaptation(receptor.adaptation),
            },
        );
    }

    for transporter in targets.transporters() {
        let key = AuxiliaryKey::TransporterDensity(transporter.key);
        defs.insert(
            key,
            AuxiliaryDefinition {
                key,
                label: format!("{} density", transporter.label),
                baseline: 1.0,
                dynamics: AuxiliaryDynamics::Adaptation(transporter.adaptation),
            },
        );
        if let Some(vesicle) = transporter.vesicle {
            let key = AuxiliaryKey::VesiclePool(vesicle);
            defs.insert(
                key,
                AuxiliaryDefinition {
                    key,
                    label: format!("{} vesicle reserve", vesicle.name()),
                    baseline: 1.0,
                    dynamics: AuxiliaryDynamics::Reserve {
                        refill_tau_min: VESICLE_REFILL_TAU_MIN,
                    },
                },
            );
        }
    }

    for enzyme in targets.enzymes() {
        let key = AuxiliaryKey::EnzymeActivity(enzyme.key);
        defs.insert(
            key,
            AuxiliaryDefinition {
                key,
                label: format!("{} activity", enzyme.label),
                baseline: 1.0,
                dynamics: AuxiliaryDynamics::Turnover {
                    tau_min: enzyme.turnover_tau_min,
                },
            },
        );
    }

    defs
}

/// Next value of a density variable after one step of length `dt_min`.
///
/// `occupancy` is signed: agonism positive, antagonism negative.
pub fn adapt_density(current: f64, baseline: f64, occupancy: f64, adaptation: &Adaptation, dt_min: f64) -> f64 {
    let k_up = adaptation.k_up_per_min;
    let rate = (k_up + adaptation.k_down_per_min * occupancy.clamp(-1.0, 1.0)).max(0.25 * k_up);
    if rate <= 0.0 {
        return current;
    }
    let target = k_up * baseline / rate;
    let next = target + (current - target) * (-dt_min * rate).exp();
    next.clamp(DENSITY_MIN * baseline, DENSITY_MAX * baseline)
}

/// Next enzyme activity given current inhibition (0..1) and induction (>= 0).
pub fn turnover_activity(current: f64, baseline: f64, inhibition: f64, induction: f64, tau_min: f64, dt_min: f64) -> f64 {
    let target = baseline * (1.0 - inhibition.clamp(0.0, 1.0)) * (1.0 + induction.max(0.0));
    target + (current - target) * (-dt_min / tau_min.max(1e-6)).exp()
}

/// Next vesicle reserve given a depletion rate (per minute).
pub fn refill_reserve(current: f64, baseline: f64, depletion_per_min: f64, refill_tau_min: f64, dt_min: f64) -> f64 {
    let refill = 1.0 / refill_tau_min.max(1e-6);
    let rate = refill + depletion_per_min.max(0.0);
    let target = baseline * refill / rate;
    target + (current - target) * (-dt_min * rate).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_target_has_an_auxiliary() {
        let targets = TargetRegistry::builtin().unwrap();
        let defs = auxiliaries_for(&targets);
        // 8 receptors + 4 transporters + 4 enzymes + 3 vesicle pools
        assert_eq!(defs.len(), 19);
        assert!(defs.contains_key(&AuxiliaryKey::VesiclePool(VesicleKey::Dopamine)));
    }

    #[test]
    fn test_agonism_downregulates_antagonism_upregulates() {
        let adaptation = Adaptation::default();
        let mut agonized = 1.0;
        let mut antagonized = 1.0;
        for _ in 0..2000 {
            agonized = adapt_density(agonized, 1.0, 0.8, &adaptation, 5.0);
            antagonized = adapt_density(antagonized, 1.0, -0.8, &adaptation, 5.0);
        }
        assert!(agonized < 0.6, "agonized density {}", agonized);
        assert!(antagonized > 1.5, "antagonized density {}", antagonized);
        assert!(antagonized <= DENSITY_MAX);
    }

    #[test]
    fn test_zero_occupancy_holds_baseline() {
        let next = adapt_density(1.0, 1.0, 0.0, &Adaptation::default(), 5.0);
        assert!((next - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reserve_depletes_and_refills() {
        let mut pool = 1.0;
        for _ in 0..100 {
            pool = refill_reserve(pool, 1.0, 0.01, VESICLE_REFILL_TAU_MIN, 5.0);
        }
        assert!(pool < 0.5, "depleted pool {}", pool);
        for _ in 0..1000 {
            pool = refill_reserve(pool, 1.0, 0.0, VESICLE_REFILL_TAU_MIN, 5.0);
        }
        assert!((pool - 1.0).abs() < 0.01, "refilled pool {}", pool);
    }
}
