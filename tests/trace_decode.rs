// SPDX-License-Identifier: MIT
// Feeds a realistic `debug_batchTraceCall` response body through the frame
// schema and the balance-delta analysis, covering the shapes a BSC node
// actually returns: a missing slot, a top-level revert, and a nested
// success with both native value moves and ERC20 Transfer logs.

use alloy::primitives::{Address, I256, U256, address};
use meme_bundler::domain::constants::NATIVE_ASSET;
use meme_bundler::network::trace::CallFrame;
use meme_bundler::trade::simulation::analyze_frames;

const SENDER: Address = address!("d715f6dabc496c7eb7ff5324cc01419e6fb3f346");
const ROUTER: Address = address!("5c952063c7fc8610ffdb798152d69f0b9550762b");
const TOKEN: Address = address!("4200000000000000000000000000000000000042");

fn response_body() -> serde_json::Value {
    serde_json::json!([
        null,
        {
            "type": "CALL",
            "from": "0xd715f6dabc496c7eb7ff5324cc01419e6fb3f346",
            "to": "0x5c952063c7fc8610ffdb798152d69f0b9550762b",
            "value": "0x0",
            "gas": "0x7a120",
            "gasUsed": "0x30d40",
            "error": "execution reverted",
            "revertReason": "insufficient output amount",
            "input": "0x"
        },
        {
            "type": "CALL",
            "from": "0xd715f6dabc496c7eb7ff5324cc01419e6fb3f346",
            "to": "0x5c952063c7fc8610ffdb798152d69f0b9550762b",
            "value": "0x2386f26fc10000",
            "gas": "0x7a120",
            "gasUsed": "0x3a980",
            "input": "0x",
            "logs": [{
                "address": "0x4200000000000000000000000000000000000042",
                "topics": [
                    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
                    "0x0000000000000000000000005c952063c7fc8610ffdb798152d69f0b9550762b",
                    "0x000000000000000000000000d715f6dabc496c7eb7ff5324cc01419e6fb3f346"
                ],
                "data": "0x00000000000000000000000000000000000000000000003635c9adc5dea00000"
            }],
            "calls": [{
                "type": "CALL",
                "from": "0x5c952063c7fc8610ffdb798152d69f0b9550762b",
                "to": "0xd715f6dabc496c7eb7ff5324cc01419e6fb3f346",
                "value": "0x38d7ea4c68000",
                "gasUsed": "0x5208",
                "input": "0x"
            }]
        }
    ])
}

#[test]
fn batch_response_decodes_and_analyzes() {
    let frames: Vec<Option<CallFrame>> =
        serde_json::from_value(response_body()).expect("decodable response");
    assert!(frames[0].is_none());

    let result = analyze_frames(&frames, 3);
    assert_eq!(result.ledgers.len(), 3);
    assert_eq!(result.gas_used[0], 0);
    // Top-level revert collapses to the zero-gas sentinel with no ledger.
    assert_eq!(result.gas_used[1], 0);
    assert!(result.ledgers[1].is_empty());
    assert!(result.bundle_reverted);

    // The clean slot keeps its gas figure and full delta set.
    assert_eq!(result.gas_used[2], 0x3a980);
    let ledger = &result.ledgers[2];
    // 0.01 BNB out, 0.001 BNB back from the router's nested call.
    let native_out = I256::try_from(10_000_000_000_000_000i128).unwrap();
    let native_back = I256::try_from(1_000_000_000_000_000i128).unwrap();
    assert_eq!(ledger.delta(NATIVE_ASSET, SENDER), native_back - native_out);
    assert_eq!(ledger.delta(NATIVE_ASSET, ROUTER), native_out - native_back);
    // 1000 tokens at 18 decimals credited to the sender.
    assert_eq!(
        ledger.credited(TOKEN, SENDER),
        Some(U256::from(1_000u64) * U256::from(10u64).pow(U256::from(18u64)))
    );
}

#[test]
fn analysis_of_one_response_is_idempotent() {
    let frames: Vec<Option<CallFrame>> =
        serde_json::from_value(response_body()).expect("decodable response");
    assert_eq!(analyze_frames(&frames, 3), analyze_frames(&frames, 3));
}
