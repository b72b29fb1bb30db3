//! Fuzz target: full reward engine against an arbitrary chain
//!
//! Verifies:
//! 1. Engine construction rejects, never panics on, arbitrary rate tables
//! 2. calc_*_rewards never panic on arbitrary heights, stakes and balances
//! 3. A fee payout never exceeds the fee pool
//! 4. Broadcast heights always skip
//!
//! Run: cargo +nightly fuzz run fuzz_reward_engine

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mxr_core::broadcast::BroadcastIntervalInfo;
use mxr_core::config::{
    ConfigError, FeeSplit, RewardAmountTable, RewardCalcPolicy, RewardCfg, RewardRateTable, StateConfig,
    KEY_ACCOUNT_FOUNDATION, KEY_ACCOUNT_INNER_MINERS, KEY_BROADCAST_INTERVAL,
};
use mxr_core::state::{ElectedNode, MemoryState};
use mxr_core::{Address, Role, SubAccount, BLK_MINER_REWARD_ADDRESS, BLK_VALIDATOR_REWARD_ADDRESS};
use mxr_reward::{BlockRewardEngine, RewardOutcome};

#[derive(Arbitrary, Debug)]
struct FuzzNode {
    tag: u8,
    role: u8,
    stake: u64,
}

#[derive(Arbitrary, Debug)]
struct FuzzEngineInput {
    rates: [u8; 8],
    miners_rate: u8,
    validator_mount: u32,
    miner_mount: u32,
    validator_half: u64,
    miner_half: u64,
    validator_treasury: i64,
    miner_treasury: i64,
    last_bc_number: u64,
    bc_interval: u64,
    nodes: Vec<FuzzNode>,
    coinbase: u8,
    inner: bool,
    leader: u8,
    num: u64,
    fees: u128,
}

fuzz_target!(|input: FuzzEngineInput| {
    let r = input.rates.map(|v| v as u64);
    let miners_rate = input.miners_rate as u64;
    let cfg = RewardCfg {
        calc: RewardCalcPolicy::Normal,
        amounts: RewardAmountTable {
            validator_mount: input.validator_mount as u64,
            validator_half: input.validator_half,
            miner_mount: input.miner_mount as u64,
            miner_half: input.miner_half,
        },
        rates: RewardRateTable {
            miner_out_rate: r[0],
            elected_miner_rate: r[1],
            foundation_miner_rate: r[2],
            leader_rate: r[3],
            elected_validators_rate: r[4],
            foundation_validator_rate: r[5],
            origin_elect_offline_rate: r[6],
            backup_reward_rate: r[7],
        },
        fee_split: Some(FeeSplit {
            miners_rate,
            validators_rate: 100u64.saturating_sub(miners_rate),
        }),
    };

    let coinbase = Address::system(input.coinbase);
    let inner: Vec<Address> = if input.inner { vec![coinbase] } else { vec![] };
    let store = match build_store(input.last_bc_number, input.bc_interval, &inner) {
        Ok(store) => store,
        Err(_) => return,
    };

    let mut state = MemoryState::new();
    state.set_balance(BLK_VALIDATOR_REWARD_ADDRESS, SubAccount::Main, input.validator_treasury as i128);
    state.set_balance(BLK_MINER_REWARD_ADDRESS, SubAccount::Main, input.miner_treasury as i128);
    state.set_election(
        0,
        input
            .nodes
            .iter()
            .map(|n| ElectedNode::new(Address::system(n.tag), Role::from_bits(n.role & 0x0F), n.stake))
            .collect(),
    );
    let parent = state.push_block(input.num.saturating_sub(1), coinbase);

    let engine = match BlockRewardEngine::new(&state, &state, cfg, &store) {
        Ok(engine) => engine,
        Err(_) => return,
    };
    let leader = Address::system(input.leader);
    let broadcast = engine.broadcast_interval().is_broadcast_number(input.num);

    let outcomes = [
        engine.calc_validator_rewards(&leader, input.num),
        engine.calc_miner_rewards(input.num, &parent),
        engine.calc_nodes_rewards(input.fees, &leader, input.num, &parent),
    ];
    for outcome in outcomes.iter().flatten() {
        if broadcast {
            assert!(outcome.is_skipped(), "broadcast height must skip");
        }
    }

    if let Ok(RewardOutcome::Distributed(map)) = &outcomes[2] {
        assert!(map.total() <= input.fees, "fee payout exceeds pool");
    }
});

fn build_store(
    last_bc_number: u64,
    bc_interval: u64,
    inner: &[Address],
) -> Result<StateConfig, ConfigError> {
    let mut store = StateConfig::new();
    store.insert(
        KEY_BROADCAST_INTERVAL,
        &BroadcastIntervalInfo {
            last_bc_number,
            bc_interval,
        },
    )?;
    store.insert(KEY_ACCOUNT_FOUNDATION, &Address::system(0xF0))?;
    store.insert(KEY_ACCOUNT_INNER_MINERS, &inner)?;
    Ok(store)
}
