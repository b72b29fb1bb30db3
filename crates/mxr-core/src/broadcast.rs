// ─────────────────────────────────────────────────────────────────
// Broadcast interval policy
// ─────────────────────────────────────────────────────────────────
// Every `bc_interval` blocks the network produces a broadcast block.
// Broadcast blocks carry no miner/validator/foundation rewards.
// The schedule is anchored at the last broadcast height recorded in
// chain state, so an interval change takes effect from that height.
// ─────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Broadcast interval record as stored in chain state.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastIntervalInfo {
    /// Height of the most recent broadcast block under this interval.
    #[serde(default)]
    pub last_bc_number: u64,
    /// Blocks between two broadcast blocks.
    pub bc_interval: u64,
}

/// Validated broadcast schedule (interval is never zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastInterval {
    last_bc_number: u64,
    bc_interval: u64,
}

impl BroadcastInterval {
    pub fn new(info: BroadcastIntervalInfo) -> Result<Self, ConfigError> {
        if info.bc_interval == 0 {
            return Err(ConfigError::ZeroBroadcastInterval);
        }
        Ok(Self {
            last_bc_number: info.last_bc_number,
            bc_interval: info.bc_interval,
        })
    }

    pub fn interval(&self) -> u64 {
        self.bc_interval
    }

    /// A height is a broadcast height iff it is congruent to the anchor
    /// modulo the interval.
    pub fn is_broadcast_number(&self, num: u64) -> bool {
        num % self.bc_interval == self.last_bc_number % self.bc_interval
    }
}
