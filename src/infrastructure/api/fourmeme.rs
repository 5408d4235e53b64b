// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! four.meme private API login: nonce generation, EIP-191 personal-sign,
//! token exchange. The bearer token is only needed for the private API
//! surface; on-chain trading works without it.

use crate::domain::error::AppError;
use alloy::primitives::Address;
use alloy::signers::SignerSync;
use alloy::signers::local::PrivateKeySigner;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_data(self, provider: &str) -> Result<T, AppError> {
        if self.code != 0 {
            return Err(AppError::Api {
                provider: provider.to_string(),
                detail: self.msg.unwrap_or_else(|| format!("code {}", self.code)),
            });
        }
        self.data.ok_or_else(|| AppError::Api {
            provider: provider.to_string(),
            detail: "missing data field".to_string(),
        })
    }
}

#[derive(Clone)]
pub struct FourMemeClient {
    client: reqwest::Client,
    base_url: String,
}

impl FourMemeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate_nonce(&self, address: Address) -> Result<String, AppError> {
        let body = json!({
            "accountAddress": address,
            "verifyType": "LOGIN",
            "networkCode": "BSC"
        });
        let envelope: ApiEnvelope<String> = self
            .post_json(&format!("{}/user/nonce/generate", self.base_url), &body)
            .await?;
        envelope.into_data("four.meme")
    }

    pub async fn login(&self, address: Address, signature: &str) -> Result<String, AppError> {
        let body = json!({
            "region": "WEB",
            "langType": "EN",
            "loginIp": "",
            "inviteCode": "",
            "verifyInfo": {
                "address": address,
                "networkCode": "BSC",
                "signature": signature,
                "verifyType": "LOGIN"
            },
            "walletName": "MetaMask"
        });
        let envelope: ApiEnvelope<String> = self
            .post_json(&format!("{}/user/login/dex", self.base_url), &body)
            .await?;
        envelope.into_data("four.meme")
    }

    /// Full login flow: nonce, personal-sign of the site's challenge, token.
    pub async fn do_login(&self, signer: &PrivateKeySigner) -> Result<String, AppError> {
        let address = signer.address();
        let nonce = self.generate_nonce(address).await?;
        tracing::debug!(target: "api", %address, "four.meme nonce received");

        let message = format!("You are sign in Meme {}", nonce);
        let signature = signer
            .sign_message_sync(message.as_bytes())
            .map_err(|e| AppError::Signing(format!("login message signing failed: {}", e)))?;

        let token = self
            .login(address, &format!("0x{}", hex::encode(signature.as_bytes())))
            .await?;
        tracing::info!(target: "api", %address, "four.meme login succeeded");
        Ok(token)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Connection(format!("four.meme request failed: {}", e)))?;
        resp.json::<T>()
            .await
            .map_err(|e| AppError::Connection(format!("four.meme response decode failed: {}", e)))
    }
}
