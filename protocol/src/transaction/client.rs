//! Node client seam.
//!
//! The builder talks to a node only through [`NetworkClient`]: once to learn
//! the chain id and once to have the node assemble raw data from a build
//! request. Transport, retries and authentication belong to the implementor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Network metadata reported by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub chain_id: String,
}

/// Response of the node's build endpoint. `result` is a loose transaction
/// record, decoded with [`Transaction::from_object`](super::Transaction::from_object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildTransactionResponse {
    pub result: Value,
}

#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn get_network(&self) -> anyhow::Result<NetworkInfo>;

    async fn build_transaction(&self, request: Value) -> anyhow::Result<BuildTransactionResponse>;
}
