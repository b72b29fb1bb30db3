//! Fuzz target: chain-state and config snapshot parsing
//!
//! Verifies:
//! 1. MemoryState::from_toml_str() / StateConfig::from_toml_str() never panic
//! 2. A parsed snapshot rebuilds to the same snapshot
//! 3. Typed config lookups on arbitrary documents never panic
//!
//! Run: cargo +nightly fuzz run fuzz_state_snapshot

#![no_main]
use libfuzzer_sys::fuzz_target;
use mxr_core::config::{ConfigStore, StateConfig};
use mxr_core::state::MemoryState;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(state) = MemoryState::from_toml_str(text) {
        // Rebuilding from the snapshot must be lossless
        let snapshot = state.snapshot();
        assert_eq!(MemoryState::from_snapshot(snapshot.clone()).snapshot(), snapshot);
    }

    if let Ok(store) = StateConfig::from_toml_str(text) {
        let _ = store.block_reward_cfg();
        let _ = store.txs_reward_cfg();
        let _ = store.broadcast_interval();
        let _ = store.foundation_account();
        let _ = store.inner_miner_accounts();
    }
});

