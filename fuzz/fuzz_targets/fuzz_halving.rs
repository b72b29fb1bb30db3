//! Fuzz target: halving and rate arithmetic
//!
//! Verifies:
//! 1. halved_reward() / calc_rate_reward() / mul_div_floor() never panic
//! 2. The halved reward never exceeds the base and never grows with height
//! 3. A rate share never exceeds its total
//!
//! Run: cargo +nightly fuzz run fuzz_halving

#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mxr_reward::halving::halved_reward;
use mxr_reward::rate::{calc_rate_reward, mul_div_floor};

#[derive(Arbitrary, Debug)]
struct FuzzHalvingInput {
    base: u128,
    num: u64,
    half_num: u64,
    rate: u8,
    a: u128,
    b: u128,
    d: u128,
}

fuzz_target!(|input: FuzzHalvingInput| {
    let reward = halved_reward(input.base, input.num, input.half_num);
    assert!(reward <= input.base);
    let later = halved_reward(input.base, input.num.saturating_add(1), input.half_num);
    assert!(later <= reward, "halved reward must not grow with height");

    let rate = (input.rate % 101) as u64;
    assert!(calc_rate_reward(input.a, rate) <= input.a);

    if input.d != 0 {
        let q = mul_div_floor(input.a, input.b, input.d);
        if input.b <= input.d {
            assert!(q <= input.a);
        }
        if let Some(prod) = input.a.checked_mul(input.b) {
            assert_eq!(q, prod / input.d);
        }
    }
});
