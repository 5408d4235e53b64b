// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Standalone jager.meme airdrop utility: walks the wallet file, records
//! claimable accounts to a CSV report, and optionally claims on-chain.
//! Claims are plain broadcast transactions, not bundles.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, U256};
use alloy::providers::Provider;
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use clap::Parser;
use meme_bundler::api::jager::{ClaimData, JagerClient};
use meme_bundler::app::config::GlobalSettings;
use meme_bundler::app::logging::setup_logging;
use meme_bundler::data::abi::AirdropClaim;
use meme_bundler::data::wallets::load_wallets;
use meme_bundler::domain::constants::{CLAIM_GAS_LIMIT, GWEI, JAGER_CLAIM_CONTRACT, JAGER_INVITOR};
use meme_bundler::domain::error::AppError;
use meme_bundler::network::provider::{ConnectionFactory, HttpProvider};
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[command(author, version, about = "jager.meme airdrop checker/claimer")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Wallet file path (overrides config `wallets_path`)
    #[arg(long)]
    wallets: Option<String>,

    /// CSV report for claimable accounts
    #[arg(long, default_value = "airdrop_available.txt")]
    output: String,

    /// Submit the on-chain claim for every claimable account
    #[arg(long, default_value_t = false)]
    claim: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), settings.log_json);

    let wallets_path = cli.wallets.unwrap_or_else(|| settings.wallets_path.clone());
    let wallets = load_wallets(&wallets_path)?;
    if wallets.is_empty() {
        return Err(AppError::Wallet(format!(
            "no address/key pairs found in {}",
            wallets_path
        )));
    }

    let api = JagerClient::new(settings.jager_api_url());
    let provider = ConnectionFactory::http(&settings.rpc_url())?;
    let gas_price = u128::from(settings.gas_price_gwei_value()) * GWEI;

    let total = wallets.len();
    let mut claimable = 0usize;
    for (index, (address, key)) in wallets.accounts().enumerate() {
        tracing::info!(target: "airdrop", account = index + 1, total, %address, "Checking account");

        match api.query_airdrop(address).await {
            Ok(status) if status.can_airdrop => {
                claimable += 1;
                append_report(&cli.output, address, &status)?;
                tracing::info!(
                    target: "airdrop",
                    %address,
                    claimed = status.claimed,
                    bnb = status.bsc_bnb_balance.as_deref().unwrap_or("0"),
                    "Airdrop claimable"
                );

                if cli.claim && !status.claimed {
                    match claim_for_account(&api, &provider, key, settings.chain_id, gas_price).await
                    {
                        Ok(tx_hash) => {
                            tracing::info!(target: "airdrop", %address, %tx_hash, "Claim submitted")
                        }
                        Err(e) => {
                            tracing::warn!(target: "airdrop", %address, error = %e, "Claim failed")
                        }
                    }
                }
            }
            Ok(_) => tracing::debug!(target: "airdrop", %address, "Nothing to claim"),
            Err(e) => tracing::warn!(target: "airdrop", %address, error = %e, "Query failed"),
        }

        if index + 1 < total {
            sleep(Duration::from_secs(1)).await;
        }
    }

    tracing::info!(target: "airdrop", total, claimable, "Check finished");
    Ok(())
}

async fn claim_for_account(
    api: &JagerClient,
    provider: &HttpProvider,
    key: &str,
    chain_id: u64,
    gas_price: u128,
) -> Result<String, AppError> {
    let signer = PrivateKeySigner::from_str(key)
        .map_err(|e| AppError::Wallet(format!("bad private key: {}", e)))?;
    let address = signer.address();

    // The API authenticates a personal-sign of the EIP-55 checksum string.
    let message = address.to_checksum(None);
    let signature = signer
        .sign_message_sync(message.as_bytes())
        .map_err(|e| AppError::Signing(format!("claim message signing failed: {}", e)))?;
    let claim = api
        .claim_airdrop(address, &format!("0x{}", hex::encode(signature.as_bytes())))
        .await?;

    let raw = build_claim_tx(&signer, &claim, provider, chain_id, gas_price).await?;
    let pending = provider
        .send_raw_transaction(&raw)
        .await
        .map_err(|e| AppError::Connection(format!("claim broadcast failed: {}", e)))?;
    Ok(format!("{:#x}", pending.tx_hash()))
}

async fn build_claim_tx(
    signer: &PrivateKeySigner,
    claim: &ClaimData,
    provider: &HttpProvider,
    chain_id: u64,
    gas_price: u128,
) -> Result<Vec<u8>, AppError> {
    let input = AirdropClaim::claimCall {
        account: claim.address,
        amount: claim.amount_wei()?,
        deadline: U256::from(claim.deadline),
        sign: claim.sign.clone(),
        instant: true,
        invitor: JAGER_INVITOR,
    }
    .abi_encode();

    let nonce = provider
        .get_transaction_count(signer.address())
        .pending()
        .await
        .map_err(|e| AppError::Connection(format!("Failed to fetch nonce: {}", e)))?;

    let mut tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price,
        gas_limit: CLAIM_GAS_LIMIT,
        to: TxKind::Call(JAGER_CLAIM_CONTRACT),
        value: U256::ZERO,
        input: Bytes::from(input),
    };
    let sig = signer
        .sign_transaction_sync(&mut tx)
        .map_err(|e| AppError::Signing(format!("Sign tx failed: {}", e)))?;
    let signed: TxEnvelope = tx.into_signed(sig).into();
    Ok(signed.encoded_2718())
}

fn append_report(
    path: &str,
    address: Address,
    status: &meme_bundler::api::jager::AirdropStatus,
) -> Result<(), AppError> {
    let new_file = !std::path::Path::new(path).exists();
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Initialization(format!("cannot open {}: {}", path, e)))?;
    if new_file {
        writeln!(file, "address,canAirdrop,claimed,bnbBalance,fourMemeVol,pancakeVol")
            .map_err(|e| AppError::Initialization(format!("report write failed: {}", e)))?;
    }
    writeln!(
        file,
        "{:#x},true,{},{},{},{}",
        address,
        status.claimed,
        status.bsc_bnb_balance.as_deref().unwrap_or("0"),
        status.bsc_four_meme_trading_vol.as_deref().unwrap_or("0"),
        status.bsc_pancake_trading_vol.as_deref().unwrap_or("0"),
    )
    .map_err(|e| AppError::Initialization(format!("report write failed: {}", e)))
}
