//! Convenience entry points kept for callers written against the older
//! dataset-scoped API. `dataset_path` is accepted and ignored: the bridge
//! operates on the repository it was configured with.

use crate::client::GitBridgeClient;
use crate::error::BridgeError;
use serde_json::Value;

pub async fn git_status_tool(client: &GitBridgeClient, _dataset_path: &str) -> Result<Value, BridgeError> {
    client.status().await
}

pub async fn git_commit_tool(
    client: &GitBridgeClient,
    _dataset_path: &str,
    message: &str,
) -> Result<Value, BridgeError> {
    client.commit(message).await
}

pub async fn git_add_tool(
    client: &GitBridgeClient,
    _dataset_path: &str,
    files: &[String],
) -> Result<Value, BridgeError> {
    client.add(files).await
}

pub async fn git_branches_tool(client: &GitBridgeClient, _dataset_path: &str) -> Result<Value, BridgeError> {
    client.branch().await
}

pub async fn git_history_tool(
    client: &GitBridgeClient,
    _dataset_path: &str,
    limit: u32,
) -> Result<Value, BridgeError> {
    client.log(limit).await
}
