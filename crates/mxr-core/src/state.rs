// ─────────────────────────────────────────────────────────────────
// Collaborator interfaces consumed by the reward engine
// ─────────────────────────────────────────────────────────────────
// StateReader  — per-address sub-account balances from the state tree
// ChainReader  — election results per height, block producer per hash
// MemoryState  — in-memory snapshot implementing both (tests, tooling)
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::ConfigError;
use crate::{AccountBalance, AccountBalances, Address, Hash, Role, SubAccount};

/// Serde adapter for i128 ↔ TOML: serialize as string, deserialize from string or integer.
/// TOML only has 64-bit integers, so balances round-trip through strings.
pub mod i128_toml {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(val: &i128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i128, D::Error> {
        use serde::de::{self, Visitor};
        struct I128Visitor;

        impl<'de> Visitor<'de> for I128Visitor {
            type Value = i128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an i128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<i128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<i128, E> {
                Ok(v as i128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<i128, E> {
                Ok(v as i128)
            }
        }

        d.deserialize_any(I128Visitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("balance of account {address} is unavailable")]
    AccountUnavailable { address: Address },
    #[error("block {hash} is unknown")]
    UnknownBlock { hash: Hash },
    #[error("no election result covers height {num}")]
    ElectionUnavailable { num: u64 },
}

pub trait StateReader: Send + Sync {
    fn get_balance(&self, address: &Address) -> Result<AccountBalances, StateError>;
}

pub trait ChainReader: Send + Sync {
    /// Elected nodes holding any role in `roles` at height `num`.
    fn elected_nodes(&self, num: u64, roles: Role) -> Result<Vec<ElectedNode>, StateError>;

    /// Producer (coinbase) of the block with the given hash.
    fn coinbase_by_hash(&self, hash: &Hash) -> Result<Address, StateError>;
}

/// One entry of an election result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElectedNode {
    pub address: Address,
    pub role: Role,
    /// Election weight (deposit). Zero-weight sets are split evenly.
    #[serde(default)]
    pub stake: u64,
}

impl ElectedNode {
    pub fn new(address: Address, role: Role, stake: u64) -> Self {
        Self {
            address,
            role,
            stake,
        }
    }
}

/// Election result effective from `from_height` until the next record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ElectionRecord {
    pub from_height: u64,
    pub nodes: Vec<ElectedNode>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlockRecord {
    pub number: u64,
    pub hash: Hash,
    pub coinbase: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub address: Address,
    pub balances: AccountBalances,
}

/// Serializable form of a [`MemoryState`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSnapshot {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
    #[serde(default)]
    pub elections: Vec<ElectionRecord>,
    #[serde(default)]
    pub blocks: Vec<BlockRecord>,
}

/// In-memory chain/state snapshot.
/// BTreeMap everywhere for deterministic iteration.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    accounts: BTreeMap<Address, AccountBalances>,
    elections: BTreeMap<u64, Vec<ElectedNode>>,
    blocks: BTreeMap<Hash, BlockRecord>,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one sub-account slot, creating the account if needed.
    pub fn set_balance(&mut self, address: Address, sub_account: SubAccount, balance: i128) {
        let slots = self.accounts.entry(address).or_default();
        match slots.iter_mut().find(|b| b.sub_account == sub_account) {
            Some(slot) => slot.balance = balance,
            None => slots.push(AccountBalance {
                sub_account,
                balance,
            }),
        }
    }

    pub fn remove_account(&mut self, address: &Address) -> bool {
        self.accounts.remove(address).is_some()
    }

    /// Record an election result effective from `from_height`.
    pub fn set_election(&mut self, from_height: u64, nodes: Vec<ElectedNode>) {
        self.elections.insert(from_height, nodes);
    }

    /// Append a block produced by `coinbase`. The hash is
    /// SHA3-256(number || coinbase), which is unique per (height, producer).
    pub fn push_block(&mut self, number: u64, coinbase: Address) -> Hash {
        let mut hasher = Sha3_256::new();
        hasher.update(number.to_le_bytes());
        hasher.update(coinbase.as_bytes());
        let hash = Hash(hasher.finalize().into());
        self.blocks.insert(
            hash,
            BlockRecord {
                number,
                hash,
                coinbase,
            },
        );
        hash
    }

    pub fn from_snapshot(snapshot: ChainSnapshot) -> Self {
        let mut state = Self::new();
        for account in snapshot.accounts {
            state.accounts.insert(account.address, account.balances);
        }
        for election in snapshot.elections {
            state.elections.insert(election.from_height, election.nodes);
        }
        for block in snapshot.blocks {
            state.blocks.insert(block.hash, block);
        }
        state
    }

    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            accounts: self
                .accounts
                .iter()
                .map(|(address, balances)| AccountRecord {
                    address: *address,
                    balances: balances.clone(),
                })
                .collect(),
            elections: self
                .elections
                .iter()
                .map(|(from_height, nodes)| ElectionRecord {
                    from_height: *from_height,
                    nodes: nodes.clone(),
                })
                .collect(),
            blocks: self.blocks.values().cloned().collect(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let snapshot: ChainSnapshot = toml::from_str(content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.snapshot())?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl StateReader for MemoryState {
    fn get_balance(&self, address: &Address) -> Result<AccountBalances, StateError> {
        self.accounts
            .get(address)
            .filter(|slots| !slots.is_empty())
            .cloned()
            .ok_or(StateError::AccountUnavailable { address: *address })
    }
}

impl ChainReader for MemoryState {
    fn elected_nodes(&self, num: u64, roles: Role) -> Result<Vec<ElectedNode>, StateError> {
        let (_, nodes) = self
            .elections
            .range(..=num)
            .next_back()
            .ok_or(StateError::ElectionUnavailable { num })?;
        Ok(nodes
            .iter()
            .filter(|node| node.role.intersects(roles))
            .cloned()
            .collect())
    }

    fn coinbase_by_hash(&self, hash: &Hash) -> Result<Address, StateError> {
        self.blocks
            .get(hash)
            .map(|block| block.coinbase)
            .ok_or(StateError::UnknownBlock { hash: *hash })
    }
}
