// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS — mxr-core
//
// Broadcast schedule, role masks and chain-state snapshots.
// Run: cargo test --release -p mxr-core --test prop_core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use mxr_core::broadcast::{BroadcastInterval, BroadcastIntervalInfo};
use mxr_core::state::{ChainReader, ElectedNode, MemoryState, StateReader};
use mxr_core::{main_balance, Address, Role, SubAccount};
use proptest::prelude::*;

fn interval(last_bc_number: u64, bc_interval: u64) -> BroadcastInterval {
    BroadcastInterval::new(BroadcastIntervalInfo {
        last_bc_number,
        bc_interval,
    })
    .unwrap()
}

fn arb_role() -> impl Strategy<Value = Role> {
    (0u8..16).prop_map(Role::from_bits)
}

// ─────────────────────────────────────────────────────────────────
// BROADCAST SCHEDULE
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: exactly one height in every window of `interval` heights broadcasts
    #[test]
    fn prop_one_broadcast_per_window(last in any::<u64>(), every in 1u64..500, start in 0u64..1_000_000) {
        let bc = interval(last, every);
        let hits = (start..start + every).filter(|n| bc.is_broadcast_number(*n)).count();
        prop_assert_eq!(hits, 1);
    }

    /// PROPERTY: the schedule repeats every `interval` heights, up to u64::MAX
    #[test]
    fn prop_broadcast_schedule_periodic(last in any::<u64>(), every in 1u64..=u64::MAX, num in any::<u64>()) {
        let bc = interval(last, every);
        if let Some(later) = num.checked_add(every) {
            prop_assert_eq!(bc.is_broadcast_number(num), bc.is_broadcast_number(later));
        }
        prop_assert!(bc.is_broadcast_number(last));
    }
}

// ─────────────────────────────────────────────────────────────────
// ROLES AND ELECTIONS
// ─────────────────────────────────────────────────────────────────

proptest! {
    /// PROPERTY: a union contains both operands
    #[test]
    fn prop_role_union_contains_parts(a in arb_role(), b in arb_role()) {
        let both = a | b;
        prop_assert!(both.contains(a));
        prop_assert!(both.contains(b));
        prop_assert_eq!(both.bits(), a.bits() | b.bits());
    }

    /// PROPERTY: elected_nodes only returns nodes holding a requested role
    #[test]
    fn prop_elected_nodes_filtered(
        roles in proptest::collection::vec(arb_role(), 0..16),
        query in arb_role(),
        num in 0u64..1_000,
    ) {
        let mut state = MemoryState::new();
        let nodes: Vec<ElectedNode> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| ElectedNode::new(Address::system(i as u8 + 1), *role, 1))
            .collect();
        state.set_election(0, nodes.clone());

        let found = state.elected_nodes(num, query).unwrap();
        prop_assert!(found.iter().all(|n| n.role.intersects(query)));
        let expected = nodes.iter().filter(|n| n.role.intersects(query)).count();
        prop_assert_eq!(found.len(), expected);
    }
}

// ─────────────────────────────────────────────────────────────────
// SNAPSHOTS
// ─────────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// PROPERTY: balances beyond TOML's 64-bit integers survive a snapshot file
    #[test]
    fn prop_wide_balances_survive_toml(balances in proptest::collection::vec(any::<i128>(), 1..8)) {
        let mut state = MemoryState::new();
        for (i, balance) in balances.iter().enumerate() {
            state.set_balance(Address::system(i as u8), SubAccount::Main, *balance);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.toml");
        state.save_to_file(&path).unwrap();
        let loaded = MemoryState::load_from_file(&path).unwrap();

        for (i, balance) in balances.iter().enumerate() {
            let slots = loaded.get_balance(&Address::system(i as u8)).unwrap();
            prop_assert_eq!(main_balance(&slots), Some(*balance));
        }
    }
}
