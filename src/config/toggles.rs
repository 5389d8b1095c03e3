//! Debug toggles: switch individual contributions to the dynamics off.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Per-run switches. Disabling one zeroes exactly that contribution and
/// leaves everything else bit-for-bit unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebugToggles {
    /// Circadian and menstrual pulses (tonic levels stay)
    pub enable_baselines: bool,
    pub enable_interventions: bool,
    pub enable_conditions: bool,
    /// Inter-signal couplings
    pub enable_couplings: bool,
    /// Density, activity and vesicle dynamics (held at baseline when off)
    pub enable_auxiliary_pools: bool,
    pub enable_receptors: bool,
    pub enable_transporters: bool,
    pub enable_enzymes: bool,
}

impl Default for DebugToggles {
    fn default() -> Self {
        Self {
            enable_baselines: true,
            enable_interventions: true,
            enable_conditions: true,
            enable_couplings: true,
            enable_auxiliary_pools: true,
            enable_receptors: true,
            enable_transporters: true,
            enable_enzymes: true,
        }
    }
}

/// Name of one toggle, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Baselines,
    Interventions,
    Conditions,
    Couplings,
    AuxiliaryPools,
    Receptors,
    Transporters,
    Enzymes,
}

impl Toggle {
    pub const ALL: [Toggle; 8] = [
        Toggle::Baselines,
        Toggle::Interventions,
        Toggle::Conditions,
        Toggle::Couplings,
        Toggle::AuxiliaryPools,
        Toggle::Receptors,
        Toggle::Transporters,
        Toggle::Enzymes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Toggle::Baselines => "baselines",
            Toggle::Interventions => "interventions",
            Toggle::Conditions => "conditions",
            Toggle::Couplings => "couplings",
            Toggle::AuxiliaryPools => "auxiliaries",
            Toggle::Receptors => "receptors",
            Toggle::Transporters => "transporters",
            Toggle::Enzymes => "enzymes",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Toggle::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s.to_lowercase())
            .ok_or_else(|| {
                let names: Vec<&str> = Toggle::ALL.iter().map(|t| t.name()).collect();
                format!("unknown toggle '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

impl DebugToggles {
    /// Turn one toggle on or off.
    pub fn set(&mut self, toggle: Toggle, enabled: bool) {
        let flag = match toggle {
            Toggle::Baselines => &mut self.enable_baselines,
            Toggle::Interventions => &mut self.enable_interventions,
            Toggle::Conditions => &mut self.enable_conditions,
            Toggle::Couplings => &mut self.enable_couplings,
            Toggle::AuxiliaryPools => &mut self.enable_auxiliary_pools,
            Toggle::Receptors => &mut self.enable_receptors,
            Toggle::Transporters => &mut self.enable_transporters,
            Toggle::Enzymes => &mut self.enable_enzymes,
        };
        *flag = enabled;
    }

    pub fn without(mut self, toggle: Toggle) -> Self {
        self.set(toggle, false);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_names_parse() {
        for toggle in Toggle::ALL {
            assert_eq!(toggle.name().parse::<Toggle>().unwrap(), toggle);
        }
        assert!("gravity".parse::<Toggle>().is_err());
    }

    #[test]
    fn test_without_clears_only_one_flag() {
        let toggles = DebugToggles::default().without(Toggle::Couplings);
        assert!(!toggles.enable_couplings);
        assert!(toggles.enable_receptors && toggles.enable_baselines && toggles.enable_interventions);
    }
}
