//! Index layout of the flat state vector.
//!
//! Signals occupy `0..SignalKey::COUNT` in declaration order; auxiliaries
//! follow in key order.

use std::collections::BTreeMap;

use crate::signals::{AuxiliaryKey, SignalKey};

#[derive(Debug, Clone, PartialEq)]
pub struct StateLayout {
    auxiliary_keys: Vec<AuxiliaryKey>,
    auxiliary_index: BTreeMap<AuxiliaryKey, usize>,
}

impl StateLayout {
    pub fn new<I>(auxiliaries: I) -> Self
    where
        I: IntoIterator<Item = AuxiliaryKey>,
    {
        let mut auxiliary_keys: Vec<AuxiliaryKey> = auxiliaries.into_iter().collect();
        auxiliary_keys.sort_unstable();
        auxiliary_keys.dedup();
        let auxiliary_index = auxiliary_keys
            .iter()
            .enumerate()
            .map(|(i, key)| (*key, SignalKey::COUNT + i))
            .collect();
        Self {
            auxiliary_keys,
            auxiliary_index,
        }
    }

    #[inline]
    pub fn signal(&self, key: SignalKey) -> usize {
        key.index()
    }

    #[inline]
    pub fn auxiliary(&self, key: AuxiliaryKey) -> Option<usize> {
        self.auxiliary_index.get(&key).copied()
    }

    pub fn auxiliary_keys(&self) -> &[AuxiliaryKey] {
        &self.auxiliary_keys
    }

    pub fn signal_count(&self) -> usize {
        SignalKey::COUNT
    }

    pub fn auxiliary_count(&self) -> usize {
        self.auxiliary_keys.len()
    }

    pub fn total_count(&self) -> usize {
        SignalKey::COUNT + self.auxiliary_keys.len()
    }
}
