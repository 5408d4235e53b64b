// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

//! Hands finished bundles to the block-builder relay via `eth_sendBundle`.
//! The relay's answer is an opaque acceptance, not an inclusion guarantee.

use crate::domain::error::AppError;
use crate::trade::builder::Bundle;
use crate::trade::refiner::SubmitBundle;
use serde_json::{Value, json};

#[derive(Clone)]
pub struct BundleSender {
    relay_url: String,
    client: reqwest::Client,
    dry_run: bool,
}

impl BundleSender {
    pub fn new(relay_url: String, dry_run: bool) -> Self {
        Self {
            relay_url,
            client: reqwest::Client::new(),
            dry_run,
        }
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }

    /// Submit an ordered list of raw signed transactions for atomic,
    /// all-or-nothing inclusion. In dry-run mode this only logs.
    pub async fn send_bundle(&self, raw_txs: &[Vec<u8>]) -> Result<Value, AppError> {
        if self.dry_run {
            tracing::info!(
                target: "executor",
                txs = raw_txs.len(),
                "Dry-run: would send bundle"
            );
            return Ok(json!({ "dryRun": true, "txs": raw_txs.len() }));
        }

        let body = bundle_request(raw_txs);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let resp = self
                .client
                .post(&self.relay_url)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| AppError::Connection(format!("Relay POST failed: {}", e)))?;

            let status = resp.status();
            let body_text = resp.text().await.unwrap_or_default();
            if status.is_success() {
                let parsed: Value = serde_json::from_str(&body_text).unwrap_or(Value::Null);
                if parsed.get("error").is_some() {
                    return Err(AppError::Connection(format!(
                        "Relay rejected bundle: {}",
                        body_text
                    )));
                }
                tracing::info!(
                    target: "executor",
                    relay = %self.relay_url,
                    txs = raw_txs.len(),
                    body = %body_text,
                    "Bundle submitted"
                );
                return Ok(parsed);
            } else if attempts < 2 {
                tracing::warn!(
                    target: "executor",
                    status = %status,
                    body = %body_text,
                    attempt = attempts,
                    "Relay returned non-success, retrying"
                );
                continue;
            } else {
                return Err(AppError::Connection(format!(
                    "Relay rejected bundle: {} body={}",
                    status, body_text
                )));
            }
        }
    }
}

impl SubmitBundle for BundleSender {
    async fn submit(&self, bundle: &Bundle) -> Result<Value, AppError> {
        let raw_txs: Vec<Vec<u8>> = bundle.iter().map(|tx| tx.raw.clone()).collect();
        self.send_bundle(&raw_txs).await
    }
}

fn bundle_request(raw_txs: &[Vec<u8>]) -> Value {
    let txs: Vec<String> = raw_txs
        .iter()
        .map(|raw| format!("0x{}", hex::encode(raw)))
        .collect();
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_sendBundle",
        "params": [{ "txs": txs }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_request_hex_encodes_payloads_in_order() {
        let body = bundle_request(&[vec![0x01, 0x02], vec![0xff]]);
        assert_eq!(body["method"], "eth_sendBundle");
        assert_eq!(body["params"][0]["txs"][0], "0x0102");
        assert_eq!(body["params"][0]["txs"][1], "0xff");
    }

    #[tokio::test]
    async fn dry_run_submission_never_touches_the_network() {
        let sender = BundleSender::new("http://127.0.0.1:1".to_string(), true);
        let resp = sender.send_bundle(&[vec![0xde, 0xad]]).await.expect("dry run");
        assert_eq!(resp["dryRun"], true);
    }
}
