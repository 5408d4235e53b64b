// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! jager.meme airdrop API: eligibility query plus claim-data retrieval. The
//! claim itself is an on-chain call made by the caller with the returned
//! server signature.

use crate::domain::error::AppError;
use alloy::primitives::{Address, Bytes, U256};
use alloy::primitives::utils::parse_ether;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self) -> Result<T, AppError> {
        if self.code != 200 {
            return Err(AppError::Api {
                provider: "jager.meme".to_string(),
                detail: self.message.unwrap_or_else(|| format!("code {}", self.code)),
            });
        }
        self.data.ok_or_else(|| AppError::Api {
            provider: "jager.meme".to_string(),
            detail: "missing data field".to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropStatus {
    #[serde(default)]
    pub can_airdrop: bool,
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub bsc_bnb_balance: Option<String>,
    #[serde(default)]
    pub bsc_four_meme_trading_vol: Option<String>,
    #[serde(default)]
    pub bsc_pancake_trading_vol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimData {
    pub address: Address,
    /// Whole-token decimal string; the contract takes wei.
    pub amount: String,
    pub deadline: u64,
    pub sign: Bytes,
}

impl ClaimData {
    pub fn amount_wei(&self) -> Result<U256, AppError> {
        parse_ether(&self.amount).map_err(|e| AppError::Api {
            provider: "jager.meme".to_string(),
            detail: format!("bad claim amount '{}': {}", self.amount, e),
        })
    }
}

#[derive(Clone)]
pub struct JagerClient {
    client: reqwest::Client,
    base_url: String,
}

impl JagerClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn query_airdrop(&self, address: Address) -> Result<AirdropStatus, AppError> {
        let url = format!("{}/queryAirdrop/{:#x}", self.base_url, address);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("jager query failed: {}", e)))?;
        let envelope: ApiEnvelope<AirdropStatus> = resp
            .json()
            .await
            .map_err(|e| AppError::Connection(format!("jager response decode failed: {}", e)))?;
        envelope.into_data()
    }

    /// Exchange a personal-sign of the checksummed address for claim data
    /// (amount, deadline, server signature) accepted by the claim contract.
    pub async fn claim_airdrop(
        &self,
        address: Address,
        signature: &str,
    ) -> Result<ClaimData, AppError> {
        let body = json!({
            "address": address,
            "solAddress": "",
            "signStr": signature,
            "solSignStr": ""
        });
        let resp = self
            .client
            .post(format!("{}/claimAirdrop", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("jager claim failed: {}", e)))?;
        let envelope: ApiEnvelope<ClaimData> = resp
            .json()
            .await
            .map_err(|e| AppError::Connection(format!("jager response decode failed: {}", e)))?;
        envelope.into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airdrop_status_parses_partial_payload() {
        let raw = r#"{"code":200,"data":{"canAirdrop":true,"bscBnbBalance":"0.42"}}"#;
        let envelope: ApiEnvelope<AirdropStatus> = serde_json::from_str(raw).expect("parse");
        let status = envelope.into_data().expect("data");
        assert!(status.can_airdrop);
        assert!(!status.claimed);
        assert_eq!(status.bsc_bnb_balance.as_deref(), Some("0.42"));
    }

    #[test]
    fn non_200_code_becomes_api_error() {
        let raw = r#"{"code":500,"message":"address not found"}"#;
        let envelope: ApiEnvelope<AirdropStatus> = serde_json::from_str(raw).expect("parse");
        let err = envelope.into_data().expect_err("must fail");
        assert!(err.to_string().contains("address not found"));
    }

    #[test]
    fn claim_amount_converts_whole_tokens_to_wei() {
        let raw = r#"{
            "address": "0xd715f6DaBC496c7eb7Ff5324cc01419E6fB3F346",
            "amount": "123.5",
            "deadline": 1750000000,
            "sign": "0xdeadbeef"
        }"#;
        let claim: ClaimData = serde_json::from_str(raw).expect("parse");
        assert_eq!(
            claim.amount_wei().expect("wei"),
            U256::from(123_500_000_000_000_000_000u128)
        );
    }
}
