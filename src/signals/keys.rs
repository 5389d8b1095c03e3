//! Signal keys.
//!
//! The enumeration is closed: every simulated run produces exactly one series
//! per key, whether or not the key has an explicit definition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a simulated physiological signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKey {
    // HPA axis and circadian hormones
    Cortisol,
    Melatonin,
    Adrenaline,
    Norepinephrine,
    // Central neurotransmitters (percent of tonic tone)
    Dopamine,
    Serotonin,
    Gaba,
    Glutamate,
    Acetylcholine,
    Histamine,
    Orexin,
    Adenosine,
    Endorphin,
    Oxytocin,
    Prolactin,
    // Anabolic, sex and thyroid hormones
    GrowthHormone,
    Testosterone,
    Estradiol,
    Progesterone,
    Tsh,
    // Metabolic
    Insulin,
    Glucagon,
    Glucose,
    Ghrelin,
    Leptin,
    Ketones,
    Lactate,
    // Autonomic and inflammatory
    HeartRate,
    VagalTone,
    Il6,
    Bdnf,
}

impl SignalKey {
    /// Number of signal keys.
    pub const COUNT: usize = 31;

    /// All keys in declaration order. The position of a key in this array is
    /// its state-vector index.
    pub const ALL: [SignalKey; Self::COUNT] = [
        SignalKey::Cortisol,
        SignalKey::Melatonin,
        SignalKey::Adrenaline,
        SignalKey::Norepinephrine,
        SignalKey::Dopamine,
        SignalKey::Serotonin,
        SignalKey::Gaba,
        SignalKey::Glutamate,
        SignalKey::Acetylcholine,
        SignalKey::Histamine,
        SignalKey::Orexin,
        SignalKey::Adenosine,
        SignalKey::Endorphin,
        SignalKey::Oxytocin,
        SignalKey::Prolactin,
        SignalKey::GrowthHormone,
        SignalKey::Testosterone,
        SignalKey::Estradiol,
        SignalKey::Progesterone,
        SignalKey::Tsh,
        SignalKey::Insulin,
        SignalKey::Glucagon,
        SignalKey::Glucose,
        SignalKey::Ghrelin,
        SignalKey::Leptin,
        SignalKey::Ketones,
        SignalKey::Lactate,
        SignalKey::HeartRate,
        SignalKey::VagalTone,
        SignalKey::Il6,
        SignalKey::Bdnf,
    ];

    /// State-vector index.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire name (camelCase, as used in scenario files and CSV headers).
    pub fn as_str(self) -> &'static str {
        match self {
            SignalKey::Cortisol => "cortisol",
            SignalKey::Melatonin => "melatonin",
            SignalKey::Adrenaline => "adrenaline",
            SignalKey::Norepinephrine => "norepinephrine",
            SignalKey::Dopamine => "dopamine",
            SignalKey::Serotonin => "serotonin",
            SignalKey::Gaba => "gaba",
            SignalKey::Glutamate => "glutamate",
            SignalKey::Acetylcholine => "acetylcholine",
            SignalKey::Histamine => "histamine",
            SignalKey::Orexin => "orexin",
            SignalKey::Adenosine => "adenosine",
            SignalKey::Endorphin => "endorphin",
            SignalKey::Oxytocin => "oxytocin",
            SignalKey::Prolactin => "prolactin",
            SignalKey::GrowthHormone => "growthHormone",
            SignalKey::Testosterone => "testosterone",
            SignalKey::Estradiol => "estradiol",
            SignalKey::Progesterone => "progesterone",
            SignalKey::Tsh => "tsh",
            SignalKey::Insulin => "insulin",
            SignalKey::Glucagon => "glucagon",
            SignalKey::Glucose => "glucose",
            SignalKey::Ghrelin => "ghrelin",
            SignalKey::Leptin => "leptin",
            SignalKey::Ketones => "ketones",
            SignalKey::Lactate => "lactate",
            SignalKey::HeartRate => "heartRate",
            SignalKey::VagalTone => "vagalTone",
            SignalKey::Il6 => "il6",
            SignalKey::Bdnf => "bdnf",
        }
    }
}

impl fmt::Display for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown signal '{}'", s))
    }
}
