// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::parsing::{parse_address_hex, parse_wei};
use crate::domain::constants;
use crate::domain::error::AppError;
use alloy::primitives::{Address, U256};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_false")]
    pub debug: bool,
    #[serde(default = "default_false")]
    pub log_json: bool,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    // Endpoints
    pub rpc_url: Option<String>,
    pub relay_url: Option<String>,
    pub four_meme_api_url: Option<String>,
    pub jager_api_url: Option<String>,

    // Accounts
    #[serde(default = "default_wallets_path")]
    pub wallets_path: String,

    // Trade
    pub target_token: Option<String>,
    /// BNB spent by the buy leg, in wei; decimal or 0x-prefixed hex.
    pub buy_amount_wei: Option<String>,
    /// Haircut applied below the measured sell output before submission.
    /// 0 reproduces a zero-tolerance guard; any on-chain price move between
    /// measurement and inclusion then reverts the sell leg.
    #[serde(default = "default_safety_margin_bps")]
    pub safety_margin_bps: u64,
    #[serde(default = "default_gas_price_gwei")]
    pub gas_price_gwei: u64,

    // Pacing
    #[serde(default = "default_account_delay_ms")]
    pub account_delay_ms: u64,

    // four.meme API
    #[serde(default = "default_false")]
    pub api_login_enabled: bool,
}

// Defaults
fn default_false() -> bool {
    false
}
fn default_chain_id() -> u64 {
    constants::CHAIN_BSC
}
fn default_wallets_path() -> String {
    "addrs.txt".to_string()
}
const DEFAULT_BUY_AMOUNT_WEI: u64 = 10_000_000_000_000_000; // 0.01 BNB
fn default_safety_margin_bps() -> u64 {
    0
}
fn default_gas_price_gwei() -> u64 {
    constants::DEFAULT_GAS_PRICE_GWEI
}
fn default_account_delay_ms() -> u64 {
    3_000
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected) = path {
            builder = builder.add_source(File::from(Path::new(selected)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Deterministic precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_with_path(None)
    }

    pub fn rpc_url(&self) -> String {
        env_string("RPC_URL")
            .or_else(|| self.rpc_url.clone())
            .unwrap_or_else(|| constants::DEFAULT_RPC_URL.to_string())
    }

    pub fn relay_url(&self) -> String {
        env_string("RELAY_URL")
            .or_else(|| self.relay_url.clone())
            .unwrap_or_else(|| constants::DEFAULT_RELAY_URL.to_string())
    }

    pub fn four_meme_api_url(&self) -> String {
        self.four_meme_api_url
            .clone()
            .unwrap_or_else(|| constants::FOUR_MEME_API_URL.to_string())
    }

    pub fn jager_api_url(&self) -> String {
        self.jager_api_url
            .clone()
            .unwrap_or_else(|| constants::JAGER_API_URL.to_string())
    }

    pub fn target_token(&self) -> Result<Option<Address>, AppError> {
        match self.target_token.as_deref() {
            None => Ok(None),
            Some(raw) => match parse_address_hex(raw) {
                Some(addr) => Ok(Some(addr)),
                None => Err(AppError::InvalidAddress(raw.to_string())),
            },
        }
    }

    pub fn buy_amount_wei(&self) -> Result<U256, AppError> {
        match self.buy_amount_wei.as_deref() {
            None => Ok(U256::from(DEFAULT_BUY_AMOUNT_WEI)),
            Some(raw) => parse_wei(raw)
                .ok_or_else(|| AppError::Config(format!("bad buy_amount_wei '{}'", raw))),
        }
    }

    pub fn safety_margin_bps_value(&self) -> u64 {
        self.safety_margin_bps.min(5_000)
    }

    pub fn gas_price_gwei_value(&self) -> u64 {
        self.gas_price_gwei.max(1)
    }

    pub fn account_delay(&self) -> Duration {
        Duration::from_millis(self.account_delay_ms)
    }

    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            constants::DEFAULT_LOG_LEVEL
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
