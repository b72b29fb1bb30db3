// ─────────────────────────────────────────────────────────────────
// Rate splitting and rate-table validation
// ─────────────────────────────────────────────────────────────────
// share = floor(total * rate / REWARD_FULL_RATE)
// Sibling shares are floored independently; the residual units are
// never redistributed. Consensus depends on reproducing that loss.
// ─────────────────────────────────────────────────────────────────

use log::error;
use mxr_core::config::{ConfigError, FeeSplit, RateGroup, RewardRateTable};
use mxr_core::REWARD_FULL_RATE;
use primitive_types::U256;

use crate::LOG_TARGET;

/// `floor(a * b / d)` without intermediate overflow. Saturates at
/// `u128::MAX` if the quotient itself does not fit. `d` must be non-zero.
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> u128 {
    if let Some(prod) = a.checked_mul(b) {
        return prod / d;
    }
    // Two 128-bit factors always fit in 256 bits
    let quot = U256::from(a) * U256::from(b) / U256::from(d);
    if quot > U256::from(u128::MAX) {
        return u128::MAX;
    }
    quot.low_u128()
}

/// `floor(total * rate / REWARD_FULL_RATE)`.
pub fn calc_rate_reward(total: u128, rate: u64) -> u128 {
    mul_div_floor(total, rate as u128, REWARD_FULL_RATE as u128)
}

/// Leader / elected / foundation shares of a validator pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorSplit {
    pub leader: u128,
    pub elected: u128,
    pub foundation: u128,
}

impl ValidatorSplit {
    pub fn new(total: u128, rates: &RewardRateTable) -> Self {
        Self {
            leader: calc_rate_reward(total, rates.leader_rate),
            elected: calc_rate_reward(total, rates.elected_validators_rate),
            foundation: calc_rate_reward(total, rates.foundation_validator_rate),
        }
    }
}

/// Miner-out / elected / foundation shares of a miner pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinerSplit {
    pub miner_out: u128,
    pub elected: u128,
    pub foundation: u128,
}

impl MinerSplit {
    pub fn new(total: u128, rates: &RewardRateTable) -> Self {
        Self {
            miner_out: calc_rate_reward(total, rates.miner_out_rate),
            elected: calc_rate_reward(total, rates.elected_miner_rate),
            foundation: calc_rate_reward(total, rates.foundation_miner_rate),
        }
    }
}

/// Primary-elected / backup shares of an elected pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectedSplit {
    pub primary: u128,
    pub backup: u128,
}

impl ElectedSplit {
    pub fn new(total: u128, rates: &RewardRateTable) -> Self {
        Self {
            primary: calc_rate_reward(total, rates.origin_elect_offline_rate),
            backup: calc_rate_reward(total, rates.backup_reward_rate),
        }
    }
}

/// Miner / validator pools of a fee reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplitAmounts {
    pub miners: u128,
    pub validators: u128,
}

impl FeeSplitAmounts {
    pub fn new(total: u128, split: &FeeSplit) -> Self {
        Self {
            miners: calc_rate_reward(total, split.miners_rate),
            validators: calc_rate_reward(total, split.validators_rate),
        }
    }
}

fn check_group(group: RateGroup, rates: &[u64]) -> Result<(), ConfigError> {
    let sum = rates
        .iter()
        .try_fold(0u64, |acc, r| acc.checked_add(*r))
        .unwrap_or(u64::MAX);
    if sum != REWARD_FULL_RATE {
        error!(target: LOG_TARGET, "{} reward rate group misconfigured, sum {}", group, sum);
        return Err(ConfigError::RateGroupMismatch { group, sum });
    }
    Ok(())
}

/// Each of the three competing groups must sum to exactly 100.
pub fn validate_rate_table(rates: &RewardRateTable) -> Result<(), ConfigError> {
    check_group(
        RateGroup::Miner,
        &[
            rates.miner_out_rate,
            rates.elected_miner_rate,
            rates.foundation_miner_rate,
        ],
    )?;
    check_group(
        RateGroup::Validator,
        &[
            rates.leader_rate,
            rates.elected_validators_rate,
            rates.foundation_validator_rate,
        ],
    )?;
    check_group(
        RateGroup::Backup,
        &[rates.origin_elect_offline_rate, rates.backup_reward_rate],
    )
}

pub fn validate_fee_split(split: &FeeSplit) -> Result<(), ConfigError> {
    check_group(
        RateGroup::FeeSplit,
        &[split.miners_rate, split.validators_rate],
    )
}
