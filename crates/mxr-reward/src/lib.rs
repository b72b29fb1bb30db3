// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MXR - BLOCK REWARD ENGINE
//
// Deterministic split of a per-block reward pool across the leader, the
// elected validator/miner sets (with backup carve-out), the foundation and
// inner-miner accounts. Two reward sources:
//   - fixed block reward: halving pool drawn from a treasury account
//   - transaction fees:   pool accumulated for the block, split miners/validators
//
// Consensus-critical: every validating node must compute the exact same map.
// Integer floor division everywhere; remainders are burned, never carried.
// The engine never writes the ledger — callers apply the returned map.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

use mxr_core::config::ConfigError;
use mxr_core::state::StateError;

pub mod engine;
pub mod factory;
pub mod foundation;
pub mod halving;
pub mod rate;
pub mod reward_map;
pub mod selected;

pub use engine::{BlockRewardEngine, RewardOutcome, SkipReason};
pub use factory::{new_block_reward, new_txs_reward};
pub use reward_map::RewardMap;

/// Log target for every reward event.
pub(crate) const LOG_TARGET: &str = "reward";

#[derive(Debug, thiserror::Error)]
pub enum RewardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// Source of the pool being distributed. Only the miner-out share
/// treats the two differently.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewardType {
    /// Fixed periodic block reward
    BlkReward,
    /// Transaction-fee reward
    TxsReward,
}

#[cfg(test)]
pub(crate) mod test_support {
    use mxr_core::broadcast::BroadcastIntervalInfo;
    use mxr_core::config::{
        RewardAmountTable, RewardCalcPolicy, RewardCfg, RewardRateTable, StateConfig,
        KEY_ACCOUNT_FOUNDATION, KEY_ACCOUNT_INNER_MINERS, KEY_BLK_REWARD_CFG,
        KEY_BROADCAST_INTERVAL, KEY_TXS_REWARD_CFG,
    };
    use mxr_core::Address;

    pub const FOUNDATION: Address = Address::system(0xF0);
    pub const INNER_MINER: Address = Address::system(0xE1);

    pub fn addr(tag: u8) -> Address {
        Address::system(tag)
    }

    /// 40/50/10 for both node groups, 80/20 primary/backup.
    pub fn sample_rates() -> RewardRateTable {
        RewardRateTable {
            miner_out_rate: 40,
            elected_miner_rate: 50,
            foundation_miner_rate: 10,
            leader_rate: 40,
            elected_validators_rate: 50,
            foundation_validator_rate: 10,
            origin_elect_offline_rate: 80,
            backup_reward_rate: 20,
        }
    }

    /// One whole coin per block for each group, halving every 1000 blocks.
    pub fn sample_cfg() -> RewardCfg {
        RewardCfg {
            calc: RewardCalcPolicy::Normal,
            amounts: RewardAmountTable {
                validator_mount: 1,
                validator_half: 1000,
                miner_mount: 1,
                miner_half: 1000,
            },
            rates: sample_rates(),
            fee_split: None,
        }
    }

    /// Store holding `sample_cfg` under both reward keys (the fee reward
    /// with a 30/70 split), broadcast every 100 blocks.
    pub fn sample_store() -> StateConfig {
        let mut txs = sample_cfg();
        txs.fee_split = Some(mxr_core::config::FeeSplit {
            miners_rate: 30,
            validators_rate: 70,
        });

        let mut store = StateConfig::new();
        store.insert(KEY_BLK_REWARD_CFG, &sample_cfg()).unwrap();
        store.insert(KEY_TXS_REWARD_CFG, &txs).unwrap();
        store
            .insert(
                KEY_BROADCAST_INTERVAL,
                &BroadcastIntervalInfo {
                    last_bc_number: 0,
                    bc_interval: 100,
                },
            )
            .unwrap();
        store.insert(KEY_ACCOUNT_FOUNDATION, &FOUNDATION).unwrap();
        store
            .insert(KEY_ACCOUNT_INNER_MINERS, &vec![INNER_MINER])
            .unwrap();
        store
    }
}
