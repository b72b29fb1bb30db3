use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use mxr_core::Address;

/// Address → amount payout of one block.
///
/// BTreeMap for deterministic iteration and serialization. Zero amounts
/// are never stored, so an empty map means "nobody is paid".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct RewardMap(BTreeMap<Address, u128>);

impl RewardMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map paying `amount` to a single address.
    pub fn single(address: Address, amount: u128) -> Self {
        let mut map = Self::new();
        map.credit(address, amount);
        map
    }

    /// Add `amount` to `address`. Saturates rather than wraps.
    pub fn credit(&mut self, address: Address, amount: u128) {
        if amount == 0 {
            return;
        }
        let entry = self.0.entry(address).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Sum `other` into `self`. Commutative and associative.
    pub fn merge(&mut self, other: &RewardMap) {
        for (address, amount) in &other.0 {
            self.credit(*address, *amount);
        }
    }

    /// Merge any number of partial maps into one.
    pub fn merge_all<'a, I>(maps: I) -> Self
    where
        I: IntoIterator<Item = &'a RewardMap>,
    {
        let mut merged = Self::new();
        for map in maps {
            merged.merge(map);
        }
        merged
    }

    pub fn get(&self, address: &Address) -> u128 {
        self.0.get(address).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all payouts.
    pub fn total(&self) -> u128 {
        self.0.values().fold(0u128, |acc, v| acc.saturating_add(*v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &u128)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<Address, u128> {
        self.0
    }

    /// JSON object keyed by `0x` address. Amounts are strings since they
    /// exceed the 53-bit integers most JSON consumers handle.
    pub fn to_json(&self) -> serde_json::Value {
        let entries = self
            .0
            .iter()
            .map(|(address, amount)| {
                (
                    address.to_hex(),
                    serde_json::Value::String(amount.to_string()),
                )
            })
            .collect();
        serde_json::Value::Object(entries)
    }
}

impl FromIterator<(Address, u128)> for RewardMap {
    fn from_iter<T: IntoIterator<Item = (Address, u128)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (address, amount) in iter {
            map.credit(address, amount);
        }
        map
    }
}

impl<'a> IntoIterator for &'a RewardMap {
    type Item = (&'a Address, &'a u128);
    type IntoIter = std::collections::btree_map::Iter<'a, Address, u128>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
