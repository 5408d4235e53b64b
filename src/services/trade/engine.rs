// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Sequential multi-account driver. Each account runs a full refinement
//! cycle to completion before the next one starts; a fixed inter-account
//! delay is the only pacing. One account's failure never stops the run.

use crate::api::fourmeme::FourMemeClient;
use crate::app::config::GlobalSettings;
use crate::data::wallets::WalletBook;
use crate::domain::constants::{FOUR_MEME_ROUTER, GWEI};
use crate::domain::error::AppError;
use crate::network::provider::HttpProvider;
use crate::network::relay::BundleSender;
use crate::network::trace::TraceClient;
use crate::trade::builder::TransactionBundleBuilder;
use crate::trade::refiner::{BundleRefiner, RefineOutcome};
use crate::trade::simulation::BundleSimulator;
use alloy::primitives::{Address, U256, utils::format_ether};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;
use tokio::time::sleep;

#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    pub submitted: usize,
    pub aborted: usize,
    pub failed: usize,
}

pub struct TradeEngine {
    provider: HttpProvider,
    sender: BundleSender,
    api: FourMemeClient,
    chain_id: u64,
    gas_price_gwei: u64,
    safety_margin_bps: u64,
    login_enabled: bool,
    delay: std::time::Duration,
}

impl TradeEngine {
    pub fn new(provider: HttpProvider, sender: BundleSender, settings: &GlobalSettings) -> Self {
        Self {
            provider,
            sender,
            api: FourMemeClient::new(settings.four_meme_api_url()),
            chain_id: settings.chain_id,
            gas_price_gwei: settings.gas_price_gwei_value(),
            safety_margin_bps: settings.safety_margin_bps_value(),
            login_enabled: settings.api_login_enabled,
            delay: settings.account_delay(),
        }
    }

    /// Run one refinement cycle per account, in file order.
    pub async fn run(&self, wallets: &WalletBook, token: Address, buy_amount: U256) -> RunSummary {
        let total = wallets.len();
        let mut summary = RunSummary::default();

        for (index, (listed_address, key)) in wallets.accounts().enumerate() {
            tracing::info!(
                target: "engine",
                account = index + 1,
                total,
                address = %listed_address,
                "Processing account"
            );

            match self.run_account(key, listed_address, token, buy_amount).await {
                Ok(RefineOutcome::Submitted {
                    token_amount,
                    min_native_out,
                    simulated_gas,
                    ..
                }) => {
                    summary.submitted += 1;
                    let gas_cost =
                        U256::from(simulated_gas) * U256::from(u128::from(self.gas_price_gwei) * GWEI);
                    tracing::info!(
                        target: "engine",
                        address = %listed_address,
                        tokens = %token_amount,
                        min_out_bnb = %format_ether(min_native_out),
                        est_gas_bnb = %format_ether(gas_cost),
                        "Bundle submitted"
                    );
                }
                Ok(RefineOutcome::Aborted { phase, reason }) => {
                    summary.aborted += 1;
                    tracing::warn!(
                        target: "engine",
                        address = %listed_address,
                        %phase,
                        %reason,
                        "Refinement aborted"
                    );
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(
                        target: "engine",
                        address = %listed_address,
                        error = %e,
                        "Account processing failed"
                    );
                }
            }

            if index + 1 < total {
                sleep(self.delay).await;
            }
        }

        tracing::info!(
            target: "engine",
            submitted = summary.submitted,
            aborted = summary.aborted,
            failed = summary.failed,
            "All accounts processed"
        );
        summary
    }

    async fn run_account(
        &self,
        key: &str,
        listed_address: Address,
        token: Address,
        buy_amount: U256,
    ) -> Result<RefineOutcome, AppError> {
        let signer = PrivateKeySigner::from_str(key)
            .map_err(|e| AppError::Wallet(format!("bad private key: {}", e)))?;
        let owner = signer.address();
        if owner != listed_address {
            // Keys are authoritative; the listed address is only a label.
            tracing::debug!(
                target: "engine",
                listed = %listed_address,
                derived = %owner,
                "Wallet file address does not match key"
            );
        }

        if self.login_enabled {
            if let Err(e) = self.api.do_login(&signer).await {
                tracing::warn!(target: "engine", address = %owner, error = %e, "four.meme login failed; trading anyway");
            }
        }

        let builder = TransactionBundleBuilder::new(
            self.provider.clone(),
            signer,
            self.chain_id,
            FOUR_MEME_ROUTER,
            self.gas_price_gwei,
        );
        let simulator = BundleSimulator::new(TraceClient::new(self.provider.clone()));
        let refiner = BundleRefiner::new(
            builder,
            simulator,
            self.sender.clone(),
            owner,
            self.safety_margin_bps,
        );

        refiner.run(token, buy_amount).await
    }
}
