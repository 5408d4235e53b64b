// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use alloy::primitives::{Address, B256, U256, address, b256};
use lazy_static::lazy_static;

// =============================================================================
// NETWORK CONSTANTS
// =============================================================================

pub const CHAIN_BSC: u64 = 56;

pub const DEFAULT_RPC_URL: &str = "https://bsc-dataseed.binance.org/";

/// 48 Club builder endpoint accepting `eth_sendBundle` for atomic inclusion.
pub const DEFAULT_RELAY_URL: &str = "https://puissant-builder.48.club/";

// =============================================================================
// ON-CHAIN ADDRESSES
// =============================================================================

/// Sentinel asset id for the chain's native coin inside balance ledgers.
pub const NATIVE_ASSET: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// four.meme token manager (router) on BSC mainnet.
pub const FOUR_MEME_ROUTER: Address = address!("5c952063c7fc8610FFDB798152D69F0B9550762b");

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_EVENT_TOPIC: B256 =
    b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef");

// =============================================================================
// OFF-CHAIN API ENDPOINTS
// =============================================================================

pub const FOUR_MEME_API_URL: &str = "https://four.meme/meme-api/v1/private";
pub const JAGER_API_URL: &str = "https://api.jager.meme/api/airdrop";

pub const JAGER_CLAIM_CONTRACT: Address = address!("DF6dbd6d4069bF0c9450538238A9643C72E4a6E4");
pub const JAGER_INVITOR: Address = address!("88888888Ce394F3D5E318B66cbEc6ED6e9cA980b");

// =============================================================================
// GAS & TRANSACTION CONSTANTS
// =============================================================================

// Per-leg limits are fixed, not estimated; BSC gas is cheap enough that
// over-provisioning beats an extra estimation round-trip per leg.
pub const APPROVE_GAS_LIMIT: u64 = 220_000;
pub const SWAP_GAS_LIMIT: u64 = 500_000;
pub const CLAIM_GAS_LIMIT: u64 = 400_000;

pub const DEFAULT_GAS_PRICE_GWEI: u64 = 1;
pub const GWEI: u128 = 1_000_000_000;

// =============================================================================
// REFINEMENT CONSTANTS
// =============================================================================

/// Floor for the measurement round's sell guard. Must be non-zero so the
/// router does not reject a zero-amount guard outright.
pub const MEASURE_MIN_NATIVE_OUT: U256 = U256::ONE;

lazy_static! {
    /// Placeholder sell amount for the probe round (10^24, i.e. one million
    /// tokens at 18 decimals). The probe sell leg is expected to revert; only
    /// the buy leg's ledger is read from that round.
    pub static ref PROBE_SELL_AMOUNT: U256 = U256::from(10u64).pow(U256::from(24u64));
}

// =============================================================================
// LOGGING DEFAULTS
// =============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";
