use log::{debug, error};
use mxr_core::broadcast::BroadcastInterval;
use mxr_core::Address;

use crate::reward_map::RewardMap;
use crate::LOG_TARGET;

/// Pays the foundation share of a pool to the foundation account.
///
/// Keeps its own copy of the broadcast policy so the share is refused on
/// broadcast heights even when called outside the engine's gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundationAllocator {
    account: Address,
    interval: BroadcastInterval,
}

impl FoundationAllocator {
    pub fn new(account: Address, interval: BroadcastInterval) -> Self {
        Self { account, interval }
    }

    pub fn account(&self) -> &Address {
        &self.account
    }

    pub fn can_calc_foundation_rewards(&self, amount: u128, num: u64) -> bool {
        if self.interval.is_broadcast_number(num) {
            return false;
        }
        if amount == 0 {
            error!(target: LOG_TARGET, "foundation reward amount is zero at num {}", num);
            return false;
        }
        true
    }

    /// `None` when the share is refused; otherwise the whole amount to the
    /// foundation account.
    pub fn calc_foundation_rewards(&self, amount: u128, num: u64) -> Option<RewardMap> {
        if !self.can_calc_foundation_rewards(amount, num) {
            return None;
        }
        debug!(
            target: LOG_TARGET,
            "foundation reward: account {} amount {}",
            self.account, amount
        );
        Some(RewardMap::single(self.account, amount))
    }
}
