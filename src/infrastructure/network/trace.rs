// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Batched speculative-execution client over `debug_batchTraceCall`.
//!
//! The node executes the whole transaction list against one snapshot with
//! intra-batch state visibility (later entries see earlier entries' effects,
//! nothing else interleaves), and returns one call-tracer frame tree per
//! entry. Frame shape is decoded defensively into an explicit schema here
//! rather than trusted.

use crate::domain::error::AppError;
use crate::network::provider::HttpProvider;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::Provider;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Block reference a batch is traced against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef {
    Latest,
    Number(u64),
}

impl BlockRef {
    pub fn as_tag(&self) -> String {
        match self {
            BlockRef::Latest => "latest".to_string(),
            BlockRef::Number(n) => format!("0x{:x}", n),
        }
    }
}

/// One not-yet-broadcast call handed to the tracer.
#[derive(Debug, Clone, Serialize)]
pub struct TraceCall {
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas: U256,
}

/// One frame of a call-tracer tree. `error`/`revertReason` are optional, as
/// is the child list; unknown fields from newer tracer versions are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    #[serde(default)]
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub value: Option<U256>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub revert_reason: Option<String>,
    #[serde(default)]
    pub logs: Vec<CallLogFrame>,
    #[serde(default)]
    pub calls: Vec<CallFrame>,
}

/// Log entry emitted inside a traced frame (`tracerConfig.withLog`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogFrame {
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<B256>,
    #[serde(default)]
    pub data: Bytes,
}

#[derive(Clone)]
pub struct TraceClient {
    provider: HttpProvider,
}

impl TraceClient {
    pub fn new(provider: HttpProvider) -> Self {
        Self { provider }
    }

    /// Trace an ordered call list against one snapshot. Returns one result
    /// slot per input call; a slot may be `null` on nodes that drop failed
    /// entries instead of reporting them.
    pub async fn trace_batch(
        &self,
        calls: &[TraceCall],
        block: BlockRef,
    ) -> Result<Vec<Option<CallFrame>>, AppError> {
        let params = json!([
            calls,
            block.as_tag(),
            {
                "tracer": "callTracer",
                "tracerConfig": { "withLog": true }
            }
        ]);

        self.provider
            .raw_request("debug_batchTraceCall".into(), params)
            .await
            .map_err(|e| AppError::Connection(format!("debug_batchTraceCall failed: {}", e)))
    }
}
