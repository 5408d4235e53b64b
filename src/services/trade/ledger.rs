// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Net balance change per (asset, holder) pair for one simulated
//! transaction, plus the fixed-signature ERC20 Transfer decoder feeding it.

use crate::domain::constants::TRANSFER_EVENT_TOPIC;
use crate::network::trace::CallLogFrame;
use alloy::primitives::{Address, I256, U256};
use std::collections::HashMap;

/// A decoded ERC20 Transfer log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub amount: U256,
}

/// Decode a raw log entry as an ERC20 Transfer iff it has at least three
/// topics and the fixed signature topic. Signature mismatch is "not
/// applicable", not an error; a matching log with malformed data is skipped
/// so one bad entry never aborts a trace walk.
pub fn decode_transfer(log: &CallLogFrame) -> Option<TokenTransfer> {
    if log.topics.len() < 3 || log.topics[0] != TRANSFER_EVENT_TOPIC {
        return None;
    }
    if log.data.len() != 32 {
        tracing::debug!(
            target: "simulation",
            token = %log.address,
            data_len = log.data.len(),
            "Skipping Transfer log with malformed data"
        );
        return None;
    }

    Some(TokenTransfer {
        token: log.address,
        from: Address::from_word(log.topics[1]),
        to: Address::from_word(log.topics[2]),
        amount: U256::from_be_slice(&log.data),
    })
}

/// asset -> holder -> signed net delta, built fresh per simulated
/// transaction. Deltas for one holder sum algebraically across effects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceDeltaLedger {
    deltas: HashMap<Address, HashMap<Address, I256>>,
}

impl BalanceDeltaLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Record one transfer of `amount` of `asset`: debit `from`, credit `to`.
    pub fn apply(&mut self, asset: Address, from: Address, to: Address, amount: U256) {
        let amount = saturating_signed(amount);
        let holders = self.deltas.entry(asset).or_default();
        let sender = holders.entry(from).or_insert(I256::ZERO);
        *sender = sender.saturating_sub(amount);
        let receiver = holders.entry(to).or_insert(I256::ZERO);
        *receiver = receiver.saturating_add(amount);
    }

    /// Net delta for one (asset, holder) pair; zero when never touched.
    pub fn delta(&self, asset: Address, holder: Address) -> I256 {
        self.deltas
            .get(&asset)
            .and_then(|holders| holders.get(&holder))
            .copied()
            .unwrap_or(I256::ZERO)
    }

    /// Positive part of the delta for one (asset, holder) pair.
    pub fn credited(&self, asset: Address, holder: Address) -> Option<U256> {
        let delta = self.delta(asset, holder);
        if delta.is_positive() {
            Some(delta.unsigned_abs())
        } else {
            None
        }
    }
}

// Amounts past I256::MAX cannot occur in a sane ERC20 but the tracer output
// is not trusted; saturate instead of panicking.
fn saturating_signed(amount: U256) -> I256 {
    I256::try_from(amount).unwrap_or(I256::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{B256, Bytes, address};

    fn transfer_log(token: Address, from: Address, to: Address, amount: u64) -> CallLogFrame {
        CallLogFrame {
            address: token,
            topics: vec![
                TRANSFER_EVENT_TOPIC,
                B256::left_padding_from(from.as_slice()),
                B256::left_padding_from(to.as_slice()),
            ],
            data: Bytes::from(U256::from(amount).to_be_bytes::<32>().to_vec()),
        }
    }

    const TOKEN: Address = address!("1000000000000000000000000000000000000001");
    const ALICE: Address = address!("a000000000000000000000000000000000000001");
    const BOB: Address = address!("b000000000000000000000000000000000000002");

    #[test]
    fn decodes_wellformed_transfer() {
        let log = transfer_log(TOKEN, ALICE, BOB, 1_000);
        let transfer = decode_transfer(&log).expect("transfer");
        assert_eq!(transfer.token, TOKEN);
        assert_eq!(transfer.from, ALICE);
        assert_eq!(transfer.to, BOB);
        assert_eq!(transfer.amount, U256::from(1_000u64));
    }

    #[test]
    fn foreign_topic_is_not_applicable() {
        let mut log = transfer_log(TOKEN, ALICE, BOB, 1);
        log.topics[0] = B256::repeat_byte(0x11);
        assert!(decode_transfer(&log).is_none());
    }

    #[test]
    fn too_few_topics_is_not_applicable() {
        let mut log = transfer_log(TOKEN, ALICE, BOB, 1);
        log.topics.truncate(2);
        assert!(decode_transfer(&log).is_none());
    }

    #[test]
    fn malformed_data_is_skipped_not_fatal() {
        let mut log = transfer_log(TOKEN, ALICE, BOB, 1);
        log.data = Bytes::from(vec![0u8; 31]);
        assert!(decode_transfer(&log).is_none());
    }

    #[test]
    fn apply_records_symmetric_deltas() {
        let mut ledger = BalanceDeltaLedger::new();
        ledger.apply(TOKEN, ALICE, BOB, U256::from(7u64));
        assert_eq!(ledger.delta(TOKEN, ALICE), I256::try_from(-7i64).unwrap());
        assert_eq!(ledger.delta(TOKEN, BOB), I256::try_from(7i64).unwrap());
    }

    #[test]
    fn deltas_sum_algebraically_across_effects() {
        let mut ledger = BalanceDeltaLedger::new();
        ledger.apply(TOKEN, ALICE, BOB, U256::from(10u64));
        ledger.apply(TOKEN, BOB, ALICE, U256::from(4u64));
        assert_eq!(ledger.delta(TOKEN, ALICE), I256::try_from(-6i64).unwrap());
        assert_eq!(ledger.delta(TOKEN, BOB), I256::try_from(6i64).unwrap());
    }

    #[test]
    fn self_transfer_nets_to_zero() {
        let mut ledger = BalanceDeltaLedger::new();
        ledger.apply(TOKEN, ALICE, ALICE, U256::from(123u64));
        assert_eq!(ledger.delta(TOKEN, ALICE), I256::ZERO);
        // The asset was still touched, so the ledger is not empty.
        assert!(!ledger.is_empty());
    }

    #[test]
    fn untouched_pairs_read_as_zero() {
        let ledger = BalanceDeltaLedger::new();
        assert_eq!(ledger.delta(TOKEN, ALICE), I256::ZERO);
        assert!(ledger.credited(TOKEN, ALICE).is_none());
    }

    #[test]
    fn credited_returns_only_positive_side() {
        let mut ledger = BalanceDeltaLedger::new();
        ledger.apply(TOKEN, ALICE, BOB, U256::from(5u64));
        assert_eq!(ledger.credited(TOKEN, BOB), Some(U256::from(5u64)));
        assert!(ledger.credited(TOKEN, ALICE).is_none());
    }

    #[test]
    fn oversized_amount_saturates_instead_of_panicking() {
        let mut ledger = BalanceDeltaLedger::new();
        ledger.apply(TOKEN, ALICE, BOB, U256::MAX);
        assert_eq!(ledger.delta(TOKEN, BOB), I256::MAX);
    }
}
