// ─────────────────────────────────────────────────────────────────
// Halving schedule for the fixed block reward
// ─────────────────────────────────────────────────────────────────
// reward(num) = base >> (num / half_num)     (half_num == 0 → base)
// The treasury must cover the whole halved reward; a treasury that
// cannot pays nothing for the block (never a partial reward).
// ─────────────────────────────────────────────────────────────────

use log::{debug, error, warn};
use mxr_core::main_balance;
use mxr_core::state::{StateError, StateReader};
use mxr_core::Address;

use crate::{RewardError, LOG_TARGET};

/// `floor(base / 2^(num / half_num))`; `half_num == 0` disables halving.
pub fn halved_reward(base: u128, num: u64, half_num: u64) -> u128 {
    let halvings = if half_num == 0 { 0 } else { num / half_num };
    if halvings >= u128::BITS as u64 {
        return 0; // Prevent overflow in shift
    }
    base >> halvings
}

/// Halved reward for `num` elapsed blocks, capped by the treasury.
///
/// Returns 0 (logged, not an error) when the treasury's main balance is
/// negative or smaller than the halved reward. Fails only when the
/// treasury balance cannot be read.
pub fn calc_reward_mount_by_number(
    state: &dyn StateReader,
    base: u128,
    num: u64,
    half_num: u64,
    treasury: &Address,
) -> Result<u128, RewardError> {
    let balances = state.get_balance(treasury)?;
    let balance = main_balance(&balances).ok_or(StateError::AccountUnavailable {
        address: *treasury,
    })?;
    if balance < 0 {
        warn!(target: LOG_TARGET, "treasury {} holds negative balance {}", treasury, balance);
        return Ok(0);
    }

    debug!(
        target: LOG_TARGET,
        "halving params: num {} half_num {} treasury {} balance {}",
        num, half_num, treasury, balance
    );
    let reward = halved_reward(base, num, half_num);
    debug!(target: LOG_TARGET, "halved block reward {}", reward);

    if (balance as u128) < reward {
        error!(
            target: LOG_TARGET,
            "treasury {} balance {} below block reward {}",
            treasury, balance, reward
        );
        return Ok(0);
    }
    Ok(reward)
}
