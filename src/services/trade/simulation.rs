// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Bundle simulation: trace every not-yet-broadcast transaction against one
//! snapshot, walk each returned call tree and distill it into a balance
//! ledger, gas figure and revert flag.

use crate::domain::constants::NATIVE_ASSET;
use crate::domain::error::AppError;
use crate::network::trace::{BlockRef, CallFrame, TraceCall, TraceClient};
use crate::trade::builder::{Bundle, SignedTx};
use crate::trade::ledger::{BalanceDeltaLedger, decode_transfer};
use crate::trade::refiner::SimulateBundle;
use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::U256;

/// Outcome of simulating an ordered batch of N transactions: N ledgers, N
/// gas figures, and one aggregate revert flag. `gas_used[i] == 0` is the
/// per-transaction revert sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    pub ledgers: Vec<BalanceDeltaLedger>,
    pub gas_used: Vec<u64>,
    pub bundle_reverted: bool,
}

impl SimulationResult {
    /// Transport-level failure: no per-transaction data, treated exactly
    /// like an on-chain revert by every caller.
    pub fn failed_closed() -> Self {
        Self {
            ledgers: Vec::new(),
            gas_used: Vec::new(),
            bundle_reverted: true,
        }
    }

    pub fn total_gas(&self) -> u64 {
        self.gas_used.iter().sum()
    }
}

/// Walk one call-tracer tree, accumulating balance deltas into `ledger`.
/// Returns the first revert signal encountered, or `None` for a clean
/// subtree. Uses an explicit worklist so adversarially deep traces cannot
/// overflow the call stack. Deltas applied before a short-circuit are kept;
/// the caller decides what to do with the ledger.
pub fn walk_frame(root: &CallFrame, ledger: &mut BalanceDeltaLedger) -> Option<String> {
    let mut stack: Vec<&CallFrame> = vec![root];

    while let Some(frame) = stack.pop() {
        if let Some(error) = &frame.error {
            return Some(match &frame.revert_reason {
                Some(reason) => format!("{} => {}", error, reason),
                None => error.clone(),
            });
        }

        if let Some(value) = frame.value {
            if !value.is_zero() {
                if let Some(to) = frame.to {
                    ledger.apply(NATIVE_ASSET, frame.from, to, value);
                }
            }
        }
        for log in &frame.logs {
            if let Some(transfer) = decode_transfer(log) {
                ledger.apply(transfer.token, transfer.from, transfer.to, transfer.amount);
            }
        }

        // Reverse push keeps execution order on a LIFO worklist; an errored
        // child is reached before its later siblings, so those are never
        // inspected once it short-circuits.
        for child in frame.calls.iter().rev() {
            stack.push(child);
        }
    }

    None
}

/// Distill raw trace slots into a [`SimulationResult`]. A missing slot, a
/// top-level revert reason or a revert anywhere in the tree all collapse to
/// the empty-ledger/zero-gas sentinel for that transaction.
pub fn analyze_frames(frames: &[Option<CallFrame>], tx_count: usize) -> SimulationResult {
    let mut ledgers = Vec::with_capacity(tx_count);
    let mut gas_used = Vec::with_capacity(tx_count);

    for i in 0..tx_count {
        let frame = match frames.get(i).and_then(|slot| slot.as_ref()) {
            Some(frame) => frame,
            None => {
                ledgers.push(BalanceDeltaLedger::new());
                gas_used.push(0);
                continue;
            }
        };

        if frame.revert_reason.is_some() {
            ledgers.push(BalanceDeltaLedger::new());
            gas_used.push(0);
            continue;
        }

        let mut ledger = BalanceDeltaLedger::new();
        match walk_frame(frame, &mut ledger) {
            Some(reason) => {
                tracing::debug!(target: "simulation", tx_index = i, %reason, "Traced transaction reverted");
                ledgers.push(BalanceDeltaLedger::new());
                gas_used.push(0);
            }
            None => {
                let gas = frame
                    .gas_used
                    .map(|g| u64::try_from(g).unwrap_or(u64::MAX))
                    .unwrap_or(0);
                ledgers.push(ledger);
                gas_used.push(gas);
            }
        }
    }

    let bundle_reverted = gas_used.iter().any(|gas| *gas == 0) || ledgers.len() != tx_count;
    SimulationResult {
        ledgers,
        gas_used,
        bundle_reverted,
    }
}

/// Convert one signed envelope back into the tracer's call shape. The
/// envelope's own `from` is carried alongside because the raw payload does
/// not expose the sender without signature recovery.
pub fn trace_call_from_signed(tx: &SignedTx) -> Result<TraceCall, AppError> {
    let envelope = TxEnvelope::decode_2718(&mut tx.raw.as_slice())
        .map_err(|e| AppError::Trade(format!("undecodable bundle payload: {}", e)))?;
    Ok(TraceCall {
        from: tx.from,
        to: envelope.to(),
        value: envelope.value(),
        input: envelope.input().clone(),
        gas: U256::from(envelope.gas_limit()),
    })
}

pub struct BundleSimulator {
    trace: TraceClient,
}

impl BundleSimulator {
    pub fn new(trace: TraceClient) -> Self {
        Self { trace }
    }
}

impl SimulateBundle for BundleSimulator {
    /// Simulate the whole bundle against one snapshot. Transport or decode
    /// failure of the batched call fails closed (empty result, bundle marked
    /// reverted); retrying is the calling orchestration's decision.
    async fn simulate(&self, bundle: &Bundle, block: BlockRef) -> SimulationResult {
        let mut calls = Vec::with_capacity(bundle.len());
        for tx in bundle {
            match trace_call_from_signed(tx) {
                Ok(call) => calls.push(call),
                Err(e) => {
                    tracing::warn!(target: "simulation", error = %e, "Bundle payload rejected before tracing");
                    return SimulationResult::failed_closed();
                }
            }
        }

        match self.trace.trace_batch(&calls, block).await {
            Ok(frames) => {
                let result = analyze_frames(&frames, bundle.len());
                tracing::debug!(
                    target: "simulation",
                    txs = bundle.len(),
                    reverted = result.bundle_reverted,
                    gas = result.total_gas(),
                    "Bundle traced"
                );
                result
            }
            Err(e) => {
                tracing::warn!(target: "simulation", error = %e, "Batch trace failed; treating bundle as reverted");
                SimulationResult::failed_closed()
            }
        }
    }
}
