// ─────────────────────────────────────────────────────────────────
// Role distribution: leader, elected sets, miner-out
// ─────────────────────────────────────────────────────────────────
// Leader    — whole amount to the block leader
// Elected   — primary/backup carve-out, then stake-weighted within each
// Miner-out — producer of the parent block, inner-miner rule first
// All strategies are pure: they return a map, never touch the ledger.
// ─────────────────────────────────────────────────────────────────

use log::{debug, warn};
use mxr_core::config::RewardRateTable;
use mxr_core::state::{ChainReader, ElectedNode};
use mxr_core::{Address, Hash, Role};

use crate::rate::{mul_div_floor, ElectedSplit};
use crate::reward_map::RewardMap;
use crate::{RewardError, RewardType, LOG_TARGET};

/// Pluggable role distribution. The engine uses [`DefaultRoleRewards`]
/// unless another implementation is installed.
pub trait RoleRewards: Send + Sync {
    fn set_leader_rewards(&self, amount: u128, leader: &Address, num: u64) -> RewardMap;

    fn get_selected_rewards(
        &self,
        amount: u128,
        chain: &dyn ChainReader,
        roles: Role,
        num: u64,
        rates: &RewardRateTable,
    ) -> Result<RewardMap, RewardError>;

    fn set_miner_out_rewards(
        &self,
        amount: u128,
        chain: &dyn ChainReader,
        num: u64,
        parent_hash: &Hash,
        inner_miners: &[Address],
        reward_type: RewardType,
    ) -> Result<RewardMap, RewardError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRoleRewards;

impl RoleRewards for DefaultRoleRewards {
    fn set_leader_rewards(&self, amount: u128, leader: &Address, num: u64) -> RewardMap {
        debug!(target: LOG_TARGET, "leader reward: num {} leader {} amount {}", num, leader, amount);
        RewardMap::single(*leader, amount)
    }

    fn get_selected_rewards(
        &self,
        amount: u128,
        chain: &dyn ChainReader,
        roles: Role,
        num: u64,
        rates: &RewardRateTable,
    ) -> Result<RewardMap, RewardError> {
        if amount == 0 {
            return Ok(RewardMap::new());
        }
        let nodes = chain.elected_nodes(num, roles)?;
        let split = ElectedSplit::new(amount, rates);

        let primary_role = roles.primary();
        let backup_role = roles.backup();
        let primary: Vec<&ElectedNode> = nodes
            .iter()
            .filter(|n| n.role.intersects(primary_role))
            .collect();
        let backup: Vec<&ElectedNode> = nodes
            .iter()
            .filter(|n| !n.role.intersects(primary_role) && n.role.intersects(backup_role))
            .collect();

        if primary.is_empty() && split.primary > 0 {
            warn!(target: LOG_TARGET, "no elected {:?} at num {}, {} undistributed", primary_role, num, split.primary);
        }
        if backup.is_empty() && split.backup > 0 {
            debug!(target: LOG_TARGET, "no elected {:?} at num {}, {} undistributed", backup_role, num, split.backup);
        }

        let mut rewards = stake_weighted_shares(split.primary, &primary);
        rewards.merge(&stake_weighted_shares(split.backup, &backup));
        Ok(rewards)
    }

    fn set_miner_out_rewards(
        &self,
        amount: u128,
        chain: &dyn ChainReader,
        num: u64,
        parent_hash: &Hash,
        inner_miners: &[Address],
        reward_type: RewardType,
    ) -> Result<RewardMap, RewardError> {
        // Block 1's parent is genesis, which nobody mined.
        if num < 2 || amount == 0 {
            return Ok(RewardMap::new());
        }
        let coinbase = chain.coinbase_by_hash(parent_hash)?;
        if coinbase.is_zero() {
            warn!(target: LOG_TARGET, "parent block {} has no coinbase, miner-out skipped", parent_hash);
            return Ok(RewardMap::new());
        }

        if inner_miners.contains(&coinbase) && reward_type == RewardType::TxsReward {
            debug!(target: LOG_TARGET, "inner miner {} takes no fee reward", coinbase);
            return Ok(RewardMap::new());
        }

        debug!(
            target: LOG_TARGET,
            "miner-out reward: num {} miner {} amount {} type {:?}",
            num, coinbase, amount, reward_type
        );
        Ok(RewardMap::single(coinbase, amount))
    }
}

/// Split `amount` across `nodes` proportionally to stake, flooring each
/// share. Zero total stake falls back to an even split. Remainders are
/// burned; an empty node list distributes nothing.
pub fn stake_weighted_shares(amount: u128, nodes: &[&ElectedNode]) -> RewardMap {
    let mut rewards = RewardMap::new();
    if amount == 0 || nodes.is_empty() {
        return rewards;
    }

    let total_stake: u128 = nodes.iter().map(|n| n.stake as u128).sum();
    if total_stake == 0 {
        let each = amount / nodes.len() as u128;
        for node in nodes {
            rewards.credit(node.address, each);
        }
        return rewards;
    }

    for node in nodes {
        let share = mul_div_floor(amount, node.stake as u128, total_stake);
        rewards.credit(node.address, share);
    }
    rewards
}
