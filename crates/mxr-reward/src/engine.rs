// ─────────────────────────────────────────────────────────────────
// Block reward engine
// ─────────────────────────────────────────────────────────────────
// validator pool = halve(validator_mount * MAN_PRICE) from its treasury
//   → leader | elected validators (+backup) | foundation
// miner pool     = halve(miner_mount * MAN_PRICE) from its treasury
//   → parent coinbase | elected miners (+backup) | foundation
// fee pool       = caller-supplied total, split miners/validators first,
//   then each half runs the matching path above
//
// Broadcast heights are checked before anything else is read, so they
// are skipped even when the treasury is unreadable.
// ─────────────────────────────────────────────────────────────────

use std::fmt;

use log::{debug, error, info, warn};
use mxr_core::broadcast::BroadcastInterval;
use mxr_core::config::{ConfigError, ConfigStore, RewardCfg};
use mxr_core::state::{ChainReader, StateReader};
use mxr_core::{Address, Hash, Role, BLK_MINER_REWARD_ADDRESS, BLK_VALIDATOR_REWARD_ADDRESS, MAN_PRICE};

use crate::foundation::FoundationAllocator;
use crate::halving::{calc_reward_mount_by_number, halved_reward};
use crate::rate::{self, FeeSplitAmounts, MinerSplit, ValidatorSplit};
use crate::reward_map::RewardMap;
use crate::selected::{DefaultRoleRewards, RoleRewards};
use crate::{RewardError, RewardType, LOG_TARGET};

/// Why a height paid nothing. Not an error: callers simply apply no map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Broadcast blocks carry no node rewards.
    BroadcastHeight { num: u64 },
    /// Treasury could not cover the halved block reward.
    NoBalance { treasury: Address },
    /// The schedule itself pays nothing: a zero mount, or a reward
    /// halved down to 0. The treasury balance is irrelevant here.
    ZeroPool { treasury: Address },
    /// Fee pool was empty.
    NonPositiveAmount,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::BroadcastHeight { num } => write!(f, "broadcast height {}", num),
            SkipReason::NoBalance { treasury } => write!(f, "treasury {} has no balance", treasury),
            SkipReason::ZeroPool { treasury } => {
                write!(f, "block reward paid from {} is zero", treasury)
            }
            SkipReason::NonPositiveAmount => f.write_str("reward amount is not positive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardOutcome {
    Distributed(RewardMap),
    Skipped(SkipReason),
}

impl RewardOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, RewardOutcome::Skipped(_))
    }

    pub fn rewards(&self) -> Option<&RewardMap> {
        match self {
            RewardOutcome::Distributed(map) => Some(map),
            RewardOutcome::Skipped(_) => None,
        }
    }

    /// The payout map; a skipped height pays nobody.
    pub fn into_rewards(self) -> RewardMap {
        match self {
            RewardOutcome::Distributed(map) => map,
            RewardOutcome::Skipped(_) => RewardMap::new(),
        }
    }
}

/// Per-epoch reward calculator.
///
/// Built from the configuration in force for an epoch and discarded when
/// that configuration changes. Every calculation is read-only against the
/// borrowed accessors, so one engine can serve many threads.
pub struct BlockRewardEngine<'a> {
    chain: &'a dyn ChainReader,
    state: &'a dyn StateReader,
    cfg: RewardCfg,
    interval: BroadcastInterval,
    foundation: FoundationAllocator,
    inner_miner_accounts: Vec<Address>,
    roles: Box<dyn RoleRewards>,
}

impl<'a> BlockRewardEngine<'a> {
    /// Validate `cfg` and resolve the remaining governing values from
    /// `store`. The fee split is checked only when present.
    pub fn new(
        chain: &'a dyn ChainReader,
        state: &'a dyn StateReader,
        cfg: RewardCfg,
        store: &dyn ConfigStore,
    ) -> Result<Self, RewardError> {
        rate::validate_rate_table(&cfg.rates)?;
        if let Some(split) = &cfg.fee_split {
            rate::validate_fee_split(split)?;
        }

        let interval = store
            .broadcast_interval()
            .and_then(BroadcastInterval::new)
            .map_err(|e| log_config_error("broadcast interval", e))?;
        let foundation_account = store
            .foundation_account()
            .map_err(|e| log_config_error("foundation account", e))?;
        let inner_miner_accounts = store
            .inner_miner_accounts()
            .map_err(|e| log_config_error("inner miner accounts", e))?;

        info!(
            target: LOG_TARGET,
            "reward engine ready: bc_interval {} foundation {} inner miners {}",
            interval.interval(),
            foundation_account,
            inner_miner_accounts.len()
        );

        Ok(Self {
            chain,
            state,
            cfg,
            interval,
            foundation: FoundationAllocator::new(foundation_account, interval),
            inner_miner_accounts,
            roles: Box::new(DefaultRoleRewards),
        })
    }

    /// Replace the role distribution strategy.
    pub fn with_role_rewards(mut self, roles: Box<dyn RoleRewards>) -> Self {
        self.roles = roles;
        self
    }

    pub fn cfg(&self) -> &RewardCfg {
        &self.cfg
    }

    pub fn broadcast_interval(&self) -> &BroadcastInterval {
        &self.interval
    }

    pub fn foundation_account(&self) -> &Address {
        self.foundation.account()
    }

    pub fn inner_miner_accounts(&self) -> &[Address] {
        &self.inner_miner_accounts
    }

    /// Fixed block reward for the validator side of block `num`.
    pub fn calc_validator_rewards(
        &self,
        leader: &Address,
        num: u64,
    ) -> Result<RewardOutcome, RewardError> {
        if let Some(skip) = self.broadcast_skip(num) {
            return Ok(skip);
        }
        let amounts = &self.cfg.amounts;
        let base = amounts.validator_mount as u128 * MAN_PRICE;
        let pool = calc_reward_mount_by_number(
            self.state,
            base,
            num.saturating_sub(1),
            amounts.validator_half,
            &BLK_VALIDATOR_REWARD_ADDRESS,
        )?;
        if pool == 0 {
            let reason = empty_pool_reason(
                base,
                num,
                amounts.validator_half,
                BLK_VALIDATOR_REWARD_ADDRESS,
            );
            error!(target: LOG_TARGET, "no validator reward at num {}: {}", num, reason);
            return Ok(RewardOutcome::Skipped(reason));
        }
        let rewards = self.validator_rewards(pool, leader, num)?;
        Ok(RewardOutcome::Distributed(rewards))
    }

    /// Fixed block reward for the miner side of block `num`.
    pub fn calc_miner_rewards(
        &self,
        num: u64,
        parent_hash: &Hash,
    ) -> Result<RewardOutcome, RewardError> {
        if let Some(skip) = self.broadcast_skip(num) {
            return Ok(skip);
        }
        let amounts = &self.cfg.amounts;
        let base = amounts.miner_mount as u128 * MAN_PRICE;
        let pool = calc_reward_mount_by_number(
            self.state,
            base,
            num.saturating_sub(1),
            amounts.miner_half,
            &BLK_MINER_REWARD_ADDRESS,
        )?;
        if pool == 0 {
            let reason =
                empty_pool_reason(base, num, amounts.miner_half, BLK_MINER_REWARD_ADDRESS);
            error!(target: LOG_TARGET, "no miner reward at num {}: {}", num, reason);
            return Ok(RewardOutcome::Skipped(reason));
        }
        let rewards = self.miner_rewards(pool, num, RewardType::BlkReward, parent_hash)?;
        Ok(RewardOutcome::Distributed(rewards))
    }

    /// Split a caller-supplied fee pool across miners and validators.
    pub fn calc_nodes_rewards(
        &self,
        total: u128,
        leader: &Address,
        num: u64,
        parent_hash: &Hash,
    ) -> Result<RewardOutcome, RewardError> {
        if let Some(skip) = self.broadcast_skip(num) {
            return Ok(skip);
        }
        if total == 0 {
            error!(target: LOG_TARGET, "fee reward at num {} is not positive", num);
            return Ok(RewardOutcome::Skipped(SkipReason::NonPositiveAmount));
        }
        let split = self.cfg.fee_split.ok_or(ConfigError::FeeSplitMissing)?;
        let pools = FeeSplitAmounts::new(total, &split);
        debug!(
            target: LOG_TARGET,
            "fee reward at num {}: total {} miners {} validators {}",
            num, total, pools.miners, pools.validators
        );

        let miners = self.miner_rewards(pools.miners, num, RewardType::TxsReward, parent_hash)?;
        let validators = self.validator_rewards(pools.validators, leader, num)?;
        Ok(RewardOutcome::Distributed(RewardMap::merge_all([
            &validators,
            &miners,
        ])))
    }

    fn broadcast_skip(&self, num: u64) -> Option<RewardOutcome> {
        if self.interval.is_broadcast_number(num) {
            warn!(target: LOG_TARGET, "num {} is a broadcast height, no rewards", num);
            return Some(RewardOutcome::Skipped(SkipReason::BroadcastHeight { num }));
        }
        None
    }

    fn validator_rewards(
        &self,
        pool: u128,
        leader: &Address,
        num: u64,
    ) -> Result<RewardMap, RewardError> {
        let split = ValidatorSplit::new(pool, &self.cfg.rates);
        let mut rewards = self.roles.set_leader_rewards(split.leader, leader, num);
        rewards.merge(&self.roles.get_selected_rewards(
            split.elected,
            self.chain,
            Role::VALIDATOR | Role::BACKUP_VALIDATOR,
            num,
            &self.cfg.rates,
        )?);
        if let Some(foundation) = self.foundation.calc_foundation_rewards(split.foundation, num) {
            rewards.merge(&foundation);
        }
        Ok(rewards)
    }

    fn miner_rewards(
        &self,
        pool: u128,
        num: u64,
        reward_type: RewardType,
        parent_hash: &Hash,
    ) -> Result<RewardMap, RewardError> {
        let split = MinerSplit::new(pool, &self.cfg.rates);
        let mut rewards = self.roles.set_miner_out_rewards(
            split.miner_out,
            self.chain,
            num,
            parent_hash,
            &self.inner_miner_accounts,
            reward_type,
        )?;
        rewards.merge(&self.roles.get_selected_rewards(
            split.elected,
            self.chain,
            Role::MINER | Role::BACKUP_MINER,
            num,
            &self.cfg.rates,
        )?);
        if let Some(foundation) = self.foundation.calc_foundation_rewards(split.foundation, num) {
            rewards.merge(&foundation);
        }
        Ok(rewards)
    }
}

fn log_config_error(what: &str, err: ConfigError) -> ConfigError {
    error!(target: LOG_TARGET, "reading {} failed: {}", what, err);
    err
}

/// Tell an unfunded treasury apart from a schedule that pays nothing.
fn empty_pool_reason(base: u128, num: u64, half: u64, treasury: Address) -> SkipReason {
    if halved_reward(base, num.saturating_sub(1), half) == 0 {
        SkipReason::ZeroPool { treasury }
    } else {
        SkipReason::NoBalance { treasury }
    }
}
