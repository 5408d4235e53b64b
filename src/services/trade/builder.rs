// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Builds and signs the ordered approve/buy/sell transaction triple. One
//! nonce fetch per build; the three legs take base, base+1, base+2, so a
//! built bundle goes stale as soon as the signer does anything else
//! on-chain.

use crate::common::retry::retry_async;
use crate::data::abi::{IERC20, TokenManager};
use crate::domain::constants::{APPROVE_GAS_LIMIT, GWEI, SWAP_GAS_LIMIT};
use crate::domain::error::AppError;
use crate::network::provider::HttpProvider;
use crate::trade::refiner::BuildBundle;
use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use std::time::Duration;

/// Signed raw payload plus its sender. The sender rides along because the
/// raw bytes alone would need signature recovery to expose it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    pub raw: Vec<u8>,
    pub from: Address,
}

/// Ordered transactions sharing one signer and consecutive nonces. Built
/// fresh per refinement round, never mutated in place.
pub type Bundle = Vec<SignedTx>;

pub const APPROVE_INDEX: usize = 0;
pub const BUY_INDEX: usize = 1;
pub const SELL_INDEX: usize = 2;

pub struct TransactionBundleBuilder {
    provider: HttpProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    router: Address,
    gas_price: u128,
}

impl TransactionBundleBuilder {
    pub fn new(
        provider: HttpProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        router: Address,
        gas_price_gwei: u64,
    ) -> Self {
        Self {
            provider,
            signer,
            chain_id,
            router,
            gas_price: u128::from(gas_price_gwei) * GWEI,
        }
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    /// Build the triple against an explicit base nonce. Pure signing, no RPC.
    pub fn build_with_nonce(
        &self,
        base_nonce: u64,
        token: Address,
        native_in: U256,
        sell_amount: U256,
        min_native_out: U256,
    ) -> Result<Bundle, AppError> {
        let approve_data = IERC20::approveCall {
            spender: self.router,
            amount: U256::MAX,
        }
        .abi_encode();
        // No floor on the buy leg; protection lives on the sell leg only.
        let buy_data = TokenManager::buyTokenAMAPCall {
            token,
            funds: native_in,
            minAmount: U256::ZERO,
        }
        .abi_encode();
        let sell_data = TokenManager::sellTokenCall {
            token,
            amount: sell_amount,
            minFunds: min_native_out,
        }
        .abi_encode();

        let approve = self.sign_leg(token, approve_data, U256::ZERO, APPROVE_GAS_LIMIT, base_nonce)?;
        let buy = self.sign_leg(self.router, buy_data, native_in, SWAP_GAS_LIMIT, base_nonce + 1)?;
        let sell = self.sign_leg(self.router, sell_data, U256::ZERO, SWAP_GAS_LIMIT, base_nonce + 2)?;

        Ok(vec![approve, buy, sell])
    }

    fn sign_leg(
        &self,
        to: Address,
        input: Vec<u8>,
        value: U256,
        gas_limit: u64,
        nonce: u64,
    ) -> Result<SignedTx, AppError> {
        let mut tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: self.gas_price,
            gas_limit,
            to: TxKind::Call(to),
            value,
            input: Bytes::from(input),
        };

        let sig = self
            .signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| AppError::Signing(format!("Sign tx failed: {}", e)))?;
        let signed: TxEnvelope = tx.into_signed(sig).into();
        Ok(SignedTx {
            raw: signed.encoded_2718(),
            from: self.signer.address(),
        })
    }

    async fn fetch_base_nonce(&self) -> Result<u64, AppError> {
        let provider = self.provider.clone();
        let address = self.signer.address();
        retry_async(
            move |_| {
                let provider = provider.clone();
                async move { provider.get_transaction_count(address).pending().await }
            },
            3,
            Duration::from_millis(100),
        )
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))
    }
}

impl BuildBundle for TransactionBundleBuilder {
    async fn build(
        &self,
        token: Address,
        native_in: U256,
        sell_amount: U256,
        min_native_out: U256,
    ) -> Result<Bundle, AppError> {
        let base_nonce = self.fetch_base_nonce().await?;
        self.build_with_nonce(base_nonce, token, native_in, sell_amount, min_native_out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::consensus::Transaction;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::address;
    use url::Url;

    const TOKEN: Address = address!("1000000000000000000000000000000000000001");
    const ROUTER: Address = address!("5c952063c7fc8610FFDB798152D69F0B9550762b");

    fn test_builder() -> TransactionBundleBuilder {
        let provider =
            HttpProvider::new_http(Url::parse("http://127.0.0.1:8545").expect("static url"));
        TransactionBundleBuilder::new(provider, PrivateKeySigner::random(), 56, ROUTER, 1)
    }

    fn decode(tx: &SignedTx) -> TxEnvelope {
        TxEnvelope::decode_2718(&mut tx.raw.as_slice()).expect("decodable envelope")
    }

    #[test]
    fn legs_carry_consecutive_nonces_from_one_base() {
        let builder = test_builder();
        let bundle = builder
            .build_with_nonce(7, TOKEN, U256::from(100u64), U256::from(1u64), U256::ZERO)
            .expect("bundle");
        assert_eq!(bundle.len(), 3);
        let nonces: Vec<u64> = bundle.iter().map(|tx| decode(tx).nonce()).collect();
        assert_eq!(nonces, vec![7, 8, 9]);
        for tx in &bundle {
            assert_eq!(tx.from, builder.signer_address());
        }
    }

    #[test]
    fn approve_targets_token_and_grants_unlimited_allowance() {
        let builder = test_builder();
        let bundle = builder
            .build_with_nonce(0, TOKEN, U256::from(100u64), U256::from(1u64), U256::ZERO)
            .expect("bundle");
        let approve = decode(&bundle[APPROVE_INDEX]);
        assert_eq!(approve.to(), Some(TOKEN));
        assert_eq!(approve.value(), U256::ZERO);
        let expected = IERC20::approveCall {
            spender: ROUTER,
            amount: U256::MAX,
        }
        .abi_encode();
        assert_eq!(approve.input().as_ref(), expected.as_slice());
    }

    #[test]
    fn buy_leg_spends_native_value_with_zero_floor() {
        let builder = test_builder();
        let native_in = U256::from(25_000_000_000_000_000u64);
        let bundle = builder
            .build_with_nonce(0, TOKEN, native_in, U256::from(1u64), U256::ZERO)
            .expect("bundle");
        let buy = decode(&bundle[BUY_INDEX]);
        assert_eq!(buy.to(), Some(ROUTER));
        assert_eq!(buy.value(), native_in);
        let expected = TokenManager::buyTokenAMAPCall {
            token: TOKEN,
            funds: native_in,
            minAmount: U256::ZERO,
        }
        .abi_encode();
        assert_eq!(buy.input().as_ref(), expected.as_slice());
    }

    #[test]
    fn sell_leg_carries_the_slippage_guard() {
        let builder = test_builder();
        let sell_amount = U256::from(1_000u64);
        let min_out = U256::from(5u64);
        let bundle = builder
            .build_with_nonce(0, TOKEN, U256::from(100u64), sell_amount, min_out)
            .expect("bundle");
        let sell = decode(&bundle[SELL_INDEX]);
        assert_eq!(sell.to(), Some(ROUTER));
        assert_eq!(sell.value(), U256::ZERO);
        let expected = TokenManager::sellTokenCall {
            token: TOKEN,
            amount: sell_amount,
            minFunds: min_out,
        }
        .abi_encode();
        assert_eq!(sell.input().as_ref(), expected.as_slice());
    }

    #[test]
    fn legs_use_fixed_gas_constants() {
        let builder = test_builder();
        let bundle = builder
            .build_with_nonce(0, TOKEN, U256::from(100u64), U256::from(1u64), U256::ZERO)
            .expect("bundle");
        assert_eq!(decode(&bundle[APPROVE_INDEX]).gas_limit(), APPROVE_GAS_LIMIT);
        assert_eq!(decode(&bundle[BUY_INDEX]).gas_limit(), SWAP_GAS_LIMIT);
        assert_eq!(decode(&bundle[SELL_INDEX]).gas_limit(), SWAP_GAS_LIMIT);
        assert_eq!(decode(&bundle[BUY_INDEX]).chain_id(), Some(56));
    }
}
