//! Pharmacological targets: receptors, transporters and enzymes.
//!
//! Target names are resolved once, when the intervention catalog is compiled,
//! against three disjoint name sets. A name that is in none of them (or in
//! more than one) is a configuration error.
//!
//! Receptor coupling weights are in signal units per minute per unit of
//! receptor drive (drive = effect gain x occupancy x receptor density).
//!
//! References:
//! - Fredholm BB et al. Pharmacol Rev. 2001;53:527-552 (adenosine receptors)
//! - Sitte HH, Freissmuth M. Trends Pharmacol Sci. 2015;36:41-50 (monoamine transporters)
//! - Youdim MBH et al. Nat Rev Neurosci. 2006;7:295-309 (MAO)

use std::collections::{BTreeMap, HashMap};

use crate::error::ConfigurationError;
use crate::signals::{SignalKey, VesicleKey};

/// Receptor identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReceptorKey {
    A1,
    A2a,
    GabaA,
    Nmda,
    Mor,
    Nachr,
    Mt1,
    H1,
}

impl ReceptorKey {
    pub const ALL: [ReceptorKey; 8] = [
        ReceptorKey::A1,
        ReceptorKey::A2a,
        ReceptorKey::GabaA,
        ReceptorKey::Nmda,
        ReceptorKey::Mor,
        ReceptorKey::Nachr,
        ReceptorKey::Mt1,
        ReceptorKey::H1,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ReceptorKey::A1 => "A1",
            ReceptorKey::A2a => "A2A",
            ReceptorKey::GabaA => "GABA_A",
            ReceptorKey::Nmda => "NMDA",
            ReceptorKey::Mor => "MOR",
            ReceptorKey::Nachr => "NACHR",
            ReceptorKey::Mt1 => "MT1",
            ReceptorKey::H1 => "H1",
        }
    }
}

/// Transporter identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransporterKey {
    Sert,
    Dat,
    Net,
    Gat1,
}

impl TransporterKey {
    pub const ALL: [TransporterKey; 4] = [
        TransporterKey::Sert,
        TransporterKey::Dat,
        TransporterKey::Net,
        TransporterKey::Gat1,
    ];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TransporterKey::Sert => "SERT",
            TransporterKey::Dat => "DAT",
            TransporterKey::Net => "NET",
            TransporterKey::Gat1 => "GAT1",
        }
    }
}

/// Enzyme identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnzymeKey {
    MaoA,
    MaoB,
    Comt,
    Ache,
}

impl EnzymeKey {
    pub const ALL: [EnzymeKey; 4] = [EnzymeKey::MaoA, EnzymeKey::MaoB, EnzymeKey::Comt, EnzymeKey::Ache];

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            EnzymeKey::MaoA => "MAO_A",
            EnzymeKey::MaoB => "MAO_B",
            EnzymeKey::Comt => "COMT",
            EnzymeKey::Ache => "ACHE",
        }
    }
}

/// A resolved target reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetHandle {
    Receptor(ReceptorKey),
    Transporter(TransporterKey),
    Enzyme(EnzymeKey),
}

impl TargetHandle {
    pub fn name(self) -> &'static str {
        match self {
            TargetHandle::Receptor(key) => key.name(),
            TargetHandle::Transporter(key) => key.name(),
            TargetHandle::Enzyme(key) => key.name(),
        }
    }
}

/// Slow density adaptation rates (per minute).
///
/// Density relaxes toward `k_up * D0 / (k_up + k_down * occupancy)`, so
/// sustained agonism downregulates and sustained antagonism upregulates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adaptation {
    pub k_up_per_min: f64,
    pub k_down_per_min: f64,
}

impl Default for Adaptation {
    fn default() -> Self {
        Self {
            k_up_per_min: 0.0005,
            k_down_per_min: 0.001,
        }
    }
}

/// Signed contribution of receptor drive to one signal's production.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReceptorCoupling {
    pub signal: SignalKey,
    /// Signal units per minute per unit drive; negative inhibits.
    pub weight: f64,
}

/// Endogenous ligand acting on a receptor, used by allosteric modulators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndogenousLigand {
    pub signal: SignalKey,
    /// Half-maximal level in the ligand's own units
    pub ec50: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceptorDefinition {
    pub key: ReceptorKey,
    pub label: String,
    pub couplings: Vec<ReceptorCoupling>,
    pub endogenous_ligand: Option<EndogenousLigand>,
    pub adaptation: Adaptation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransporterDefinition {
    pub key: TransporterKey,
    pub label: String,
    /// Signal this transporter clears (and releases, under a releasing agent)
    pub primary: SignalKey,
    /// Fraction of the primary signal's clearance carried by this transporter
    pub clearance_share: f64,
    /// Maximal reverse-transport release, signal units per minute
    pub release_rate_per_min: f64,
    /// Vesicle pool feeding release, if any
    pub vesicle: Option<VesicleKey>,
    /// Vesicle depletion rate per unit release (per minute)
    pub depletion_per_min: f64,
    pub adaptation: Adaptation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnzymeDefinition {
    pub key: EnzymeKey,
    pub label: String,
    pub substrates: Vec<SignalKey>,
    /// Fraction of each substrate's clearance carried by this enzyme
    pub clearance_share: f64,
    /// Time for activity to follow inhibition or induction (minutes)
    pub turnover_tau_min: f64,
}

/// A clearance route acting on a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceRoute {
    Transporter(TransporterKey),
    Enzyme(EnzymeKey),
}

/// Registry of all pharmacological targets.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    receptors: BTreeMap<ReceptorKey, ReceptorDefinition>,
    transporters: BTreeMap<TransporterKey, TransporterDefinition>,
    enzymes: BTreeMap<EnzymeKey, EnzymeDefinition>,
    receptor_names: HashMap<String, ReceptorKey>,
    transporter_names: HashMap<String, TransporterKey>,
    enzyme_names: HashMap<String, EnzymeKey>,
}

impl TargetRegistry {
    /// Build a registry, checking that names are unique and the three name
    /// sets are disjoint.
    pub fn from_definitions(
        receptors: Vec<ReceptorDefinition>,
        transporters: Vec<TransporterDefinition>,
        enzymes: Vec<EnzymeDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut registry = Self {
            receptors: BTreeMap::new(),
            transporters: BTreeMap::new(),
            enzymes: BTreeMap::new(),
            receptor_names: HashMap::new(),
            transporter_names: HashMap::new(),
            enzyme_names: HashMap::new(),
        };

        for def in receptors {
            let name = def.key.name().to_string();
            if registry.receptor_names.insert(name.clone(), def.key).is_some() {
                return Err(ConfigurationError::DuplicateKey(name));
            }
            registry.receptors.insert(def.key, def);
        }
        for def in transporters {
            let name = def.key.name().to_string();
            if registry.receptor_names.contains_key(&name) {
                return Err(ConfigurationError::AmbiguousTarget(name));
            }
            if registry.transporter_names.insert(name.clone(), def.key).is_some() {
                return Err(ConfigurationError::DuplicateKey(name));
            }
            if !(0.0..=1.0).contains(&def.clearance_share) {
                return Err(ConfigurationError::InvalidDefinition {
                    key: name,
                    reason: format!("clearance share {} outside [0, 1]", def.clearance_share),
                });
            }
            registry.transporters.insert(def.key, def);
        }
        for def in enzymes {
            let name = def.key.name().to_string();
            if registry.receptor_names.contains_key(&name)
                || registry.transporter_names.contains_key(&name)
            {
                return Err(ConfigurationError::AmbiguousTarget(name));
            }
            if registry.enzyme_names.insert(name.clone(), def.key).is_some() {
                return Err(ConfigurationError::DuplicateKey(name));
            }
            if !(0.0..=1.0).contains(&def.clearance_share) || def.turnover_tau_min <= 0.0 {
                return Err(ConfigurationError::InvalidDefinition {
                    key: name,
                    reason: "enzyme needs a share in [0, 1] and a positive turnover time".to_string(),
                });
            }
            registry.enzymes.insert(def.key, def);
        }

        Ok(registry)
    }

    /// The built-in target set.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Self::from_definitions(builtin_receptors(), builtin_transporters(), builtin_enzymes())
    }

    /// Resolve a target name to a handle.
    pub fn resolve(&self, name: &str) -> Option<TargetHandle> {
        if let Some(key) = self.receptor_names.get(name) {
            return Some(TargetHandle::Receptor(*key));
        }
        if let Some(key) = self.transporter_names.get(name) {
            return Some(TargetHandle::Transporter(*key));
        }
        self.enzyme_names.get(name).map(|key| TargetHandle::Enzyme(*key))
    }

    pub fn receptor(&self, key: ReceptorKey) -> Option<&ReceptorDefinition> {
        self.receptors.get(&key)
    }

    pub fn transporter(&self, key: TransporterKey) -> Option<&TransporterDefinition> {
        self.transporters.get(&key)
    }

    pub fn enzyme(&self, key: EnzymeKey) -> Option<&EnzymeDefinition> {
        self.enzymes.get(&key)
    }

    pub fn receptors(&self) -> impl Iterator<Item = &ReceptorDefinition> {
        self.receptors.values()
    }

    pub fn transporters(&self) -> impl Iterator<Item = &TransporterDefinition> {
        self.transporters.values()
    }

    pub fn enzymes(&self) -> impl Iterator<Item = &EnzymeDefinition> {
        self.enzymes.values()
    }

    /// Transporters and enzymes that clear `signal`.
    pub fn clearance_routes(&self, signal: SignalKey) -> Vec<ClearanceRoute> {
        let mut routes: Vec<ClearanceRoute> = self
            .transporters
            .values()
            .filter(|t| t.primary == signal)
            .map(|t| ClearanceRoute::Transporter(t.key))
            .collect();
        routes.extend(
            self.enzymes
                .values()
                .filter(|e| e.substrates.contains(&signal))
                .map(|e| ClearanceRoute::Enzyme(e.key)),
        );
        routes
    }

    /// All target names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .receptor_names
            .keys()
            .chain(self.transporter_names.keys())
            .chain(self.enzyme_names.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

fn receptor(
    key: ReceptorKey,
    label: &str,
    couplings: &[(SignalKey, f64)],
    endogenous_ligand: Option<EndogenousLigand>,
    adaptation: Adaptation,
) -> ReceptorDefinition {
    ReceptorDefinition {
        key,
        label: label.to_string(),
        couplings: couplings
            .iter()
            .map(|&(signal, weight)| ReceptorCoupling { signal, weight })
            .collect(),
        endogenous_ligand,
        adaptation,
    }
}

fn builtin_receptors() -> Vec<ReceptorDefinition> {
    use SignalKey::*;
    vec![
        // Tonic adenosine brake on arousal; caffeine lifts it
        receptor(
            ReceptorKey::A1,
            "Adenosine A1",
            &[
                (Norepinephrine, -15.0),
                (Adrenaline, -2.0),
                (HeartRate, -1.0),
                (Acetylcholine, -1.0),
                (Glutamate, -1.0),
                (Cortisol, -0.03),
            ],
            None,
            Adaptation::default(),
        ),
        receptor(
            ReceptorKey::A2a,
            "Adenosine A2A",
            &[
                (Dopamine, -1.0),
                (Cortisol, -0.05),
                (Adrenaline, -2.0),
                (Histamine, -1.0),
            ],
            None,
            Adaptation::default(),
        ),
        receptor(
            ReceptorKey::GabaA,
            "GABA-A",
            &[
                (Glutamate, -2.0),
                (Norepinephrine, -10.0),
                (Adrenaline, -2.0),
                (Cortisol, -0.02),
                (HeartRate, -1.0),
                (Orexin, -1.0),
                (Histamine, -1.0),
            ],
            Some(EndogenousLigand { signal: Gaba, ec50: 100.0 }),
            Adaptation {
                k_up_per_min: 0.0005,
                k_down_per_min: 0.0005,
            },
        ),
        receptor(
            ReceptorKey::Nmda,
            "NMDA",
            &[(Glutamate, 2.0), (Acetylcholine, 1.0)],
            None,
            Adaptation::default(),
        ),
        receptor(
            ReceptorKey::Mor,
            "Mu opioid",
            &[(Dopamine, 10.0), (HeartRate, -2.0), (Cortisol, -0.05)],
            Some(EndogenousLigand { signal: Endorphin, ec50: 100.0 }),
            Adaptation::default(),
        ),
        // Fast desensitization
        receptor(
            ReceptorKey::Nachr,
            "Nicotinic ACh",
            &[
                (Dopamine, 15.0),
                (Adrenaline, 8.0),
                (Norepinephrine, 30.0),
                (HeartRate, 4.0),
                (Acetylcholine, 2.0),
                (Cortisol, 0.05),
                (VagalTone, -1.0),
            ],
            None,
            Adaptation {
                k_up_per_min: 0.002,
                k_down_per_min: 0.02,
            },
        ),
        receptor(
            ReceptorKey::Mt1,
            "Melatonin MT1",
            &[
                (Orexin, -1.0),
                (Cortisol, -0.02),
                (HeartRate, -1.0),
                (Gaba, 0.5),
                (VagalTone, 1.0),
            ],
            None,
            Adaptation::default(),
        ),
        receptor(
            ReceptorKey::H1,
            "Histamine H1",
            &[(Orexin, 1.0), (Acetylcholine, 1.0), (Norepinephrine, 5.0)],
            Some(EndogenousLigand { signal: Histamine, ec50: 60.0 }),
            Adaptation::default(),
        ),
    ]
}

fn builtin_transporters() -> Vec<TransporterDefinition> {
    vec![
        TransporterDefinition {
            key: TransporterKey::Sert,
            label: "Serotonin transporter".to_string(),
            primary: SignalKey::Serotonin,
            clearance_share: 0.7,
            release_rate_per_min: 4.0,
            vesicle: Some(VesicleKey::Serotonin),
            depletion_per_min: 0.002,
            adaptation: Adaptation {
                k_up_per_min: 0.0002,
                k_down_per_min: 0.0004,
            },
        },
        TransporterDefinition {
            key: TransporterKey::Dat,
            label: "Dopamine transporter".to_string(),
            primary: SignalKey::Dopamine,
            clearance_share: 0.8,
            release_rate_per_min: 6.0,
            vesicle: Some(VesicleKey::Dopamine),
            depletion_per_min: 0.002,
            adaptation: Adaptation::default(),
        },
        TransporterDefinition {
            key: TransporterKey::Net,
            label: "Norepinephrine transporter".to_string(),
            primary: SignalKey::Norepinephrine,
            clearance_share: 0.6,
            release_rate_per_min: 30.0,
            vesicle: Some(VesicleKey::Norepinephrine),
            depletion_per_min: 0.002,
            adaptation: Adaptation::default(),
        },
        TransporterDefinition {
            key: TransporterKey::Gat1,
            label: "GABA transporter 1".to_string(),
            primary: SignalKey::Gaba,
            clearance_share: 0.5,
            release_rate_per_min: 2.0,
            vesicle: None,
            depletion_per_min: 0.0,
            adaptation: Adaptation::default(),
        },
    ]
}

fn builtin_enzymes() -> Vec<EnzymeDefinition> {
    use SignalKey::*;
    vec![
        EnzymeDefinition {
            key: EnzymeKey::MaoA,
            label: "Monoamine oxidase A".to_string(),
            substrates: vec![Serotonin, Norepinephrine, Dopamine],
            clearance_share: 0.3,
            turnover_tau_min: 120.0,
        },
        EnzymeDefinition {
            key: EnzymeKey::MaoB,
            label: "Monoamine oxidase B".to_string(),
            substrates: vec![Dopamine],
            clearance_share: 0.2,
            turnover_tau_min: 120.0,
        },
        EnzymeDefinition {
            key: EnzymeKey::Comt,
            label: "Catechol-O-methyltransferase".to_string(),
            substrates: vec![Dopamine, Norepinephrine, Adrenaline],
            clearance_share: 0.2,
            turnover_tau_min: 120.0,
        },
        EnzymeDefinition {
            key: EnzymeKey::Ache,
            label: "Acetylcholinesterase".to_string(),
            substrates: vec![Acetylcholine],
            clearance_share: 0.9,
            turnover_tau_min: 60.0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_resolve_to_their_class() {
        let registry = TargetRegistry::builtin().unwrap();
        assert_eq!(registry.resolve("A1"), Some(TargetHandle::Receptor(ReceptorKey::A1)));
        assert_eq!(
            registry.resolve("SERT"),
            Some(TargetHandle::Transporter(TransporterKey::Sert))
        );
        assert_eq!(registry.resolve("MAO_A"), Some(TargetHandle::Enzyme(EnzymeKey::MaoA)));
        assert_eq!(registry.resolve("5HT2A"), None);
        assert_eq!(registry.names().len(), 16);
    }

    #[test]
    fn test_duplicate_receptor_rejected() {
        let twice = vec![builtin_receptors()[0].clone(), builtin_receptors()[0].clone()];
        let err = TargetRegistry::from_definitions(twice, vec![], vec![]).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateKey("A1".to_string()));
    }

    #[test]
    fn test_clearance_routes_for_dopamine() {
        let registry = TargetRegistry::builtin().unwrap();
        let routes = registry.clearance_routes(SignalKey::Dopamine);
        assert!(routes.contains(&ClearanceRoute::Transporter(TransporterKey::Dat)));
        assert!(routes.contains(&ClearanceRoute::Enzyme(EnzymeKey::MaoA)));
        assert!(routes.contains(&ClearanceRoute::Enzyme(EnzymeKey::MaoB)));
        assert!(routes.contains(&ClearanceRoute::Enzyme(EnzymeKey::Comt)));
        assert_eq!(routes.len(), 4);
    }
}
