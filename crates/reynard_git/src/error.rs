use crate::operations::GitOperation;
use reynard_core::ToolError;
use std::time::Duration;

/// Failure of a bridge call.
///
/// Transport failures (non-200 status) and application failures
/// (`success: false`) are separate variants so callers that care can tell
/// them apart; at the executor boundary both become `ToolExecutionError`.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to build HTTP client: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("MCP bridge returned {status} for '{operation}': {body}")]
    Transport {
        operation: GitOperation,
        status: u16,
        body: String,
    },

    #[error("MCP tool call '{operation}' failed: {message}")]
    Rejected {
        operation: GitOperation,
        message: String,
    },

    #[error("MCP bridge unreachable for '{operation}': {source}")]
    Unavailable {
        operation: GitOperation,
        #[source]
        source: reqwest::Error,
    },

    #[error("MCP bridge call '{operation}' timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        operation: GitOperation,
        timeout: Duration,
    },

    #[error("MCP bridge sent an invalid response for '{operation}': {source}")]
    InvalidResponse {
        operation: GitOperation,
        #[source]
        source: reqwest::Error,
    },
}

impl BridgeError {
    pub fn operation(&self) -> Option<GitOperation> {
        match self {
            BridgeError::Setup(_) => None,
            BridgeError::Transport { operation, .. }
            | BridgeError::Rejected { operation, .. }
            | BridgeError::Unavailable { operation, .. }
            | BridgeError::Timeout { operation, .. }
            | BridgeError::InvalidResponse { operation, .. } => Some(*operation),
        }
    }
}

impl From<BridgeError> for ToolError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Timeout { timeout, .. } => ToolError::Timeout {
                after: timeout,
                message: err.to_string(),
            },
            BridgeError::Unavailable { .. } | BridgeError::Setup(_) => {
                ToolError::resource(err.to_string())
            }
            BridgeError::Transport { .. }
            | BridgeError::Rejected { .. }
            | BridgeError::InvalidResponse { .. } => ToolError::execution(err.to_string()),
        }
    }
}
