// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use clap::Parser;
use meme_bundler::app::config::GlobalSettings;
use meme_bundler::app::logging::setup_logging;
use meme_bundler::data::wallets::load_wallets;
use meme_bundler::domain::error::AppError;
use meme_bundler::network::provider::ConnectionFactory;
use meme_bundler::network::relay::BundleSender;
use meme_bundler::trade::engine::TradeEngine;

#[derive(Parser, Debug)]
#[command(author, version, about = "four.meme buy/approve/sell bundle sniper")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long)]
    config: Option<String>,

    /// Do not submit bundles, only simulate/log
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Token to snipe (overrides config `target_token`)
    #[arg(long)]
    token: Option<Address>,

    /// Wallet file path (overrides config `wallets_path`)
    #[arg(long)]
    wallets: Option<String>,

    /// BNB spent per account, in wei (overrides config `buy_amount_wei`)
    #[arg(long)]
    buy_amount_wei: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    setup_logging(settings.log_level(), settings.log_json);

    let token = match cli.token {
        Some(token) => token,
        None => settings.target_token()?.ok_or_else(|| {
            AppError::Config("no target token (set target_token or --token)".into())
        })?,
    };
    let buy_amount = match cli.buy_amount_wei {
        Some(wei) => U256::from(wei),
        None => settings.buy_amount_wei()?,
    };
    let wallets_path = cli.wallets.unwrap_or_else(|| settings.wallets_path.clone());

    let wallets = load_wallets(&wallets_path)?;
    if wallets.is_empty() {
        return Err(AppError::Wallet(format!(
            "no address/key pairs found in {}",
            wallets_path
        )));
    }

    let provider = ConnectionFactory::http(&settings.rpc_url())?;
    let sender = BundleSender::new(settings.relay_url(), cli.dry_run);

    tracing::info!(
        target: "engine",
        %token,
        accounts = wallets.len(),
        rpc = %settings.rpc_url(),
        relay = %settings.relay_url(),
        dry_run = cli.dry_run,
        "Starting bundle run"
    );

    let engine = TradeEngine::new(provider, sender, &settings);
    let summary = engine.run(&wallets, token, buy_amount).await;

    if summary.submitted == 0 {
        tracing::warn!(target: "engine", "Run finished without a single accepted bundle");
    }
    Ok(())
}
