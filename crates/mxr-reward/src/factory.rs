// ─────────────────────────────────────────────────────────────────
// Reward kind factories
// ─────────────────────────────────────────────────────────────────
// Block reward → `blk_reward_cfg`, fee reward → `txs_reward_cfg`.
// A kind whose policy is `stop` yields no engine for the epoch.
// ─────────────────────────────────────────────────────────────────

use log::{error, info};
use mxr_core::config::{
    ConfigError, ConfigStore, RewardCalcPolicy, RewardCfg, KEY_BLK_REWARD_CFG, KEY_TXS_REWARD_CFG,
};
use mxr_core::state::{ChainReader, StateReader};

use crate::engine::BlockRewardEngine;
use crate::{RewardError, LOG_TARGET};

/// Engine for the fixed block reward of the current epoch.
pub fn new_block_reward<'a>(
    chain: &'a dyn ChainReader,
    state: &'a dyn StateReader,
    store: &dyn ConfigStore,
) -> Result<BlockRewardEngine<'a>, RewardError> {
    let cfg = active_cfg(KEY_BLK_REWARD_CFG, store.block_reward_cfg())?;
    BlockRewardEngine::new(chain, state, cfg, store)
}

/// Engine for the transaction-fee reward of the current epoch. The
/// configuration must carry a miners/validators split.
pub fn new_txs_reward<'a>(
    chain: &'a dyn ChainReader,
    state: &'a dyn StateReader,
    store: &dyn ConfigStore,
) -> Result<BlockRewardEngine<'a>, RewardError> {
    let cfg = active_cfg(KEY_TXS_REWARD_CFG, store.txs_reward_cfg())?;
    if cfg.fee_split.is_none() {
        error!(target: LOG_TARGET, "`{}` has no fee split", KEY_TXS_REWARD_CFG);
        return Err(ConfigError::FeeSplitMissing.into());
    }
    BlockRewardEngine::new(chain, state, cfg, store)
}

fn active_cfg(
    key: &'static str,
    cfg: Result<RewardCfg, ConfigError>,
) -> Result<RewardCfg, ConfigError> {
    let cfg = cfg.map_err(|e| {
        error!(target: LOG_TARGET, "reading `{}` failed: {}", key, e);
        e
    })?;
    if cfg.calc == RewardCalcPolicy::Stop {
        info!(target: LOG_TARGET, "`{}` calculation stopped", key);
        return Err(ConfigError::RewardStopped { key });
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_cfg, sample_store};
    use crate::RewardOutcome;
    use mxr_core::state::MemoryState;
    use mxr_core::{Address, SubAccount, BLK_VALIDATOR_REWARD_ADDRESS, MAN_PRICE};

    #[test]
    fn test_block_reward_factory() {
        let mut state = MemoryState::new();
        state.set_balance(BLK_VALIDATOR_REWARD_ADDRESS, SubAccount::Main, MAN_PRICE as i128);
        state.set_election(0, vec![]);
        let store = sample_store();

        let engine = new_block_reward(&state, &state, &store).unwrap();
        assert_eq!(engine.cfg().fee_split, None);
        let outcome = engine
            .calc_validator_rewards(&Address::system(1), 2)
            .unwrap();
        assert!(matches!(outcome, RewardOutcome::Distributed(_)));
    }

    #[test]
    fn test_txs_reward_factory() {
        let mut state = MemoryState::new();
        state.set_election(0, vec![]);
        let parent = state.push_block(1, Address::system(5));
        let store = sample_store();

        let engine = new_txs_reward(&state, &state, &store).unwrap();
        let map = engine
            .calc_nodes_rewards(1000, &Address::system(1), 2, &parent)
            .unwrap()
            .into_rewards();
        // Empty elections: only leader, miner-out and foundation are paid
        assert_eq!(map.get(&Address::system(1)), 280);
        assert_eq!(map.get(&Address::system(5)), 120);
    }

    #[test]
    fn test_stopped_kind_yields_no_engine() {
        let state = MemoryState::new();
        let mut store = sample_store();
        let mut cfg = sample_cfg();
        cfg.calc = RewardCalcPolicy::Stop;
        store.insert(KEY_BLK_REWARD_CFG, &cfg).unwrap();

        assert!(matches!(
            new_block_reward(&state, &state, &store),
            Err(RewardError::Config(ConfigError::RewardStopped {
                key: KEY_BLK_REWARD_CFG
            }))
        ));
        // The fee reward is unaffected
        assert!(new_txs_reward(&state, &state, &store).is_ok());
    }

    #[test]
    fn test_txs_reward_requires_fee_split() {
        let state = MemoryState::new();
        let mut store = sample_store();
        store.insert(KEY_TXS_REWARD_CFG, &sample_cfg()).unwrap();
        assert!(matches!(
            new_txs_reward(&state, &state, &store),
            Err(RewardError::Config(ConfigError::FeeSplitMissing))
        ));
    }

    #[test]
    fn test_missing_cfg_is_unavailable() {
        let state = MemoryState::new();
        let mut store = sample_store();
        store.remove(KEY_BLK_REWARD_CFG);
        assert!(matches!(
            new_block_reward(&state, &state, &store),
            Err(RewardError::Config(ConfigError::ConfigUnavailable {
                key: KEY_BLK_REWARD_CFG
            }))
        ));
    }
}
