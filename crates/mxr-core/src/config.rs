use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::broadcast::BroadcastIntervalInfo;
use crate::Address;

/// Chain-state key of the fixed block reward configuration.
pub const KEY_BLK_REWARD_CFG: &str = "blk_reward_cfg";
/// Chain-state key of the transaction-fee reward configuration.
pub const KEY_TXS_REWARD_CFG: &str = "txs_reward_cfg";
pub const KEY_BROADCAST_INTERVAL: &str = "broadcast_interval";
pub const KEY_ACCOUNT_FOUNDATION: &str = "account_foundation";
pub const KEY_ACCOUNT_INNER_MINERS: &str = "account_inner_miners";

/// Which rate group failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateGroup {
    /// miner_out + elected_miner + foundation_miner
    Miner,
    /// leader + elected_validators + foundation_validator
    Validator,
    /// origin_elect_offline + backup_reward
    Backup,
    /// miners + validators (fee reward top-level split)
    FeeSplit,
}

impl fmt::Display for RateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RateGroup::Miner => "miner",
            RateGroup::Validator => "validator",
            RateGroup::Backup => "backup",
            RateGroup::FeeSplit => "fee split",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config `{key}` is not present in chain state")]
    ConfigUnavailable { key: &'static str },
    #[error("config `{key}` has the wrong shape: {reason}")]
    ConfigTypeMismatch { key: &'static str, reason: String },
    #[error("{group} reward rates sum to {sum}, expected {expected}", expected = crate::REWARD_FULL_RATE)]
    RateGroupMismatch { group: RateGroup, sum: u64 },
    #[error("fee reward split (miners/validators rate) is not configured")]
    FeeSplitMissing,
    #[error("broadcast interval must be non-zero")]
    ZeroBroadcastInterval,
    #[error("reward calculation for `{key}` is stopped")]
    RewardStopped { key: &'static str },
    #[error("config io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config encode: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Whether a reward kind is being paid at all.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewardCalcPolicy {
    #[default]
    Normal,
    Stop,
}

/// Competing percentage groups. Each group sums to `REWARD_FULL_RATE`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardRateTable {
    pub miner_out_rate: u64,
    pub elected_miner_rate: u64,
    pub foundation_miner_rate: u64,

    pub leader_rate: u64,
    pub elected_validators_rate: u64,
    pub foundation_validator_rate: u64,

    pub origin_elect_offline_rate: u64,
    pub backup_reward_rate: u64,
}

/// Fixed per-block pools (whole MAN) and their halving intervals.
/// A halving interval of 0 means the pool never halves.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardAmountTable {
    pub validator_mount: u64,
    pub validator_half: u64,
    pub miner_mount: u64,
    pub miner_half: u64,
}

/// Top-level split of a fee reward between the miner and validator pools.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    pub miners_rate: u64,
    pub validators_rate: u64,
}

/// Reward configuration for one reward kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RewardCfg {
    #[serde(default)]
    pub calc: RewardCalcPolicy,
    #[serde(default)]
    pub amounts: RewardAmountTable,
    pub rates: RewardRateTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_split: Option<FeeSplit>,
}

/// Typed lookups of the governing reward configuration in chain state.
pub trait ConfigStore {
    fn block_reward_cfg(&self) -> Result<RewardCfg, ConfigError>;
    fn txs_reward_cfg(&self) -> Result<RewardCfg, ConfigError>;
    fn broadcast_interval(&self) -> Result<BroadcastIntervalInfo, ConfigError>;
    fn foundation_account(&self) -> Result<Address, ConfigError>;
    fn inner_miner_accounts(&self) -> Result<Vec<Address>, ConfigError>;
}

/// Chain-state configuration snapshot: one TOML table per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateConfig {
    entries: toml::Table,
}

impl StateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let entries: toml::Table = toml::from_str(content)?;
        Ok(Self { entries })
    }

    /// Load a snapshot from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save the snapshot to a TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(&self.entries)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ConfigError> {
        let value = toml::Value::try_from(value)?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn lookup<T: DeserializeOwned>(&self, key: &'static str) -> Result<T, ConfigError> {
        let value = self
            .entries
            .get(key)
            .ok_or(ConfigError::ConfigUnavailable { key })?;
        value
            .clone()
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ConfigTypeMismatch {
                key,
                reason: e.message().to_string(),
            })
    }
}

impl ConfigStore for StateConfig {
    fn block_reward_cfg(&self) -> Result<RewardCfg, ConfigError> {
        self.lookup(KEY_BLK_REWARD_CFG)
    }

    fn txs_reward_cfg(&self) -> Result<RewardCfg, ConfigError> {
        self.lookup(KEY_TXS_REWARD_CFG)
    }

    fn broadcast_interval(&self) -> Result<BroadcastIntervalInfo, ConfigError> {
        self.lookup(KEY_BROADCAST_INTERVAL)
    }

    fn foundation_account(&self) -> Result<Address, ConfigError> {
        self.lookup(KEY_ACCOUNT_FOUNDATION)
    }

    fn inner_miner_accounts(&self) -> Result<Vec<Address>, ConfigError> {
        self.lookup(KEY_ACCOUNT_INNER_MINERS)
    }
}
