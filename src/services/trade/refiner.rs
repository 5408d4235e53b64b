// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Discover-then-commit calibration: probe the buy leg for the exact token
//! amount it yields, measure the sell leg's exact native output for that
//! amount, then submit the real bundle with the measured value as the sell
//! guard. One simulation per round, no automatic retries; a failed round
//! surfaces which phase died and the whole cycle is abandoned.

use crate::domain::constants::{MEASURE_MIN_NATIVE_OUT, NATIVE_ASSET, PROBE_SELL_AMOUNT};
use crate::domain::error::AppError;
use crate::network::trace::BlockRef;
use crate::trade::builder::{BUY_INDEX, Bundle, SELL_INDEX};
use crate::trade::simulation::SimulationResult;
use alloy::primitives::{Address, U256};
use serde_json::Value;
use std::fmt;

/// Builds one signed approve/buy/sell bundle for the given parameters.
pub trait BuildBundle {
    async fn build(
        &self,
        token: Address,
        native_in: U256,
        sell_amount: U256,
        min_native_out: U256,
    ) -> Result<Bundle, AppError>;
}

/// Speculatively executes a bundle against a chain snapshot.
pub trait SimulateBundle {
    async fn simulate(&self, bundle: &Bundle, block: BlockRef) -> SimulationResult;
}

/// Hands a finished bundle to the relay for atomic inclusion.
pub trait SubmitBundle {
    async fn submit(&self, bundle: &Bundle) -> Result<Value, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinePhase {
    Probing,
    MeasuringOutput,
    Finalizing,
}

impl fmt::Display for RefinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefinePhase::Probing => "probing",
            RefinePhase::MeasuringOutput => "measuring-output",
            RefinePhase::Finalizing => "finalizing",
        };
        write!(f, "{}", name)
    }
}

/// Terminal state of one refinement run.
#[derive(Debug, Clone)]
pub enum RefineOutcome {
    Submitted {
        /// Exact token quantity bought and re-sold.
        token_amount: U256,
        /// Sell guard carried by the submitted bundle.
        min_native_out: U256,
        /// Gas the measurement round consumed across all three legs.
        simulated_gas: u64,
        /// Whatever the relay answered; acceptance only, not inclusion.
        relay_response: Value,
    },
    Aborted {
        phase: RefinePhase,
        reason: String,
    },
}

pub struct BundleRefiner<B, S, T> {
    builder: B,
    simulator: S,
    submitter: T,
    owner: Address,
    safety_margin_bps: u64,
}

impl<B, S, T> BundleRefiner<B, S, T>
where
    B: BuildBundle,
    S: SimulateBundle,
    T: SubmitBundle,
{
    pub fn new(builder: B, simulator: S, submitter: T, owner: Address, safety_margin_bps: u64) -> Self {
        Self {
            builder,
            simulator,
            submitter,
            owner,
            safety_margin_bps,
        }
    }

    /// Tear the refiner back into its capabilities, e.g. to inspect a
    /// recording submitter after a run.
    pub fn into_parts(self) -> (B, S, T) {
        (self.builder, self.simulator, self.submitter)
    }

    pub async fn run(&self, token: Address, native_in: U256) -> Result<RefineOutcome, AppError> {
        // Probing: oversized sell amount, no guard. The sell leg is expected
        // to revert here; only the buy leg's ledger matters.
        let probe = self
            .builder
            .build(token, native_in, *PROBE_SELL_AMOUNT, U256::ZERO)
            .await?;
        let sim = self.simulator.simulate(&probe, BlockRef::Latest).await;
        let token_amount = match leg_receipt(&sim, BUY_INDEX, token, self.owner) {
            Some(amount) => amount,
            None => {
                return Ok(RefineOutcome::Aborted {
                    phase: RefinePhase::Probing,
                    reason: "buy simulation failed".to_string(),
                });
            }
        };
        tracing::info!(
            target: "refiner",
            token = %token,
            amount = %token_amount,
            "Probe round measured token receipt"
        );

        // MeasuringOutput: sell exactly what the buy yields, with a token
        // floor so the router does not reject a zero guard.
        let measure = self
            .builder
            .build(token, native_in, token_amount, MEASURE_MIN_NATIVE_OUT)
            .await?;
        let sim = self.simulator.simulate(&measure, BlockRef::Latest).await;
        let native_out = match leg_receipt(&sim, SELL_INDEX, NATIVE_ASSET, self.owner) {
            Some(amount) => amount,
            None => {
                return Ok(RefineOutcome::Aborted {
                    phase: RefinePhase::MeasuringOutput,
                    reason: "sell simulation failed".to_string(),
                });
            }
        };
        let simulated_gas = sim.total_gas();
        tracing::info!(
            target: "refiner",
            native_out = %native_out,
            "Measurement round fixed the sell output"
        );

        // Finalizing: same amounts, measured guard (minus the configured
        // haircut), real submission instead of a third simulation.
        let min_native_out = apply_margin(native_out, self.safety_margin_bps);
        let bundle = self
            .builder
            .build(token, native_in, token_amount, min_native_out)
            .await?;
        let relay_response = self.submitter.submit(&bundle).await?;

        Ok(RefineOutcome::Submitted {
            token_amount,
            min_native_out,
            simulated_gas,
            relay_response,
        })
    }
}

/// Amount credited to `holder` in `asset` by the leg at `index`, or `None`
/// when that leg hit the zero-gas revert sentinel, produced no ledger, or
/// credited nothing.
fn leg_receipt(
    sim: &SimulationResult,
    index: usize,
    asset: Address,
    holder: Address,
) -> Option<U256> {
    if sim.gas_used.get(index).copied().unwrap_or(0) == 0 {
        return None;
    }
    let ledger = sim.ledgers.get(index)?;
    if ledger.is_empty() {
        return None;
    }
    ledger.credited(asset, holder)
}

/// Haircut below the measured output: 0 bps reproduces the zero-tolerance
/// guard, anything above trades expected output for inclusion robustness.
fn apply_margin(measured: U256, margin_bps: u64) -> U256 {
    if margin_bps == 0 {
        return measured;
    }
    let bps = U256::from(margin_bps.min(10_000));
    measured - measured * bps / U256::from(10_000u64)
}
