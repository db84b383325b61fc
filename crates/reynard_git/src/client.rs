use crate::error::BridgeError;
use crate::operations::{
    GitCommand, GitOperation, DEFAULT_REMOTE, DEFAULT_REMOTE_ACTION, DEFAULT_RESET_MODE,
    DEFAULT_STASH_ACTION,
};
use reqwest::StatusCode;
use reynard_core::config::BridgeConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

const BRIDGE_PATH: &str = "/api/mcp-bridge/tools/call";
const BRIDGE_TOOL: &str = "git_tool";

// ============================================================================
// Wire envelopes
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BridgeRequest {
    pub tool: String,
    pub arguments: BridgeArguments,
    pub context: BridgeIdentity,
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeArguments {
    pub operation: GitOperation,
    pub args: Map<String, Value>,
}

/// Caller identity reported to the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeIdentity {
    pub user_id: String,
    pub user_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    /// Usually a string; some bridge versions send a structured object.
    #[serde(default)]
    pub error: Option<Value>,
}

impl BridgeResponse {
    /// Failure text for a `success: false` reply.
    pub fn error_message(&self) -> String {
        match &self.error {
            None | Some(Value::Null) => "Unknown error".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

// ============================================================================
// GitBridgeClient
// ============================================================================

/// Forwards git operations to the backend's MCP bridge endpoint.
///
/// Every helper builds its operation's `args` through `GitCommand` and
/// goes through `call`, so there is one request path and one error policy.
#[derive(Debug, Clone)]
pub struct GitBridgeClient {
    backend_url: String,
    timeout: Duration,
    identity: BridgeIdentity,
    http: reqwest::Client,
}

impl GitBridgeClient {
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BridgeError::Setup)?;
        Ok(Self {
            backend_url: config.backend_url.trim_end_matches('/').to_string(),
            timeout,
            identity: BridgeIdentity {
                user_id: config.user_id.clone(),
                user_role: config.user_role.clone(),
            },
            http,
        })
    }

    /// Client for `backend_url` with the remaining settings at their defaults.
    pub fn with_backend_url(backend_url: &str) -> Result<Self, BridgeError> {
        Self::new(&BridgeConfig {
            backend_url: backend_url.to_string(),
            ..BridgeConfig::default()
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn identity(&self) -> &BridgeIdentity {
        &self.identity
    }

    pub fn build_request(&self, operation: GitOperation, args: Map<String, Value>) -> BridgeRequest {
        BridgeRequest {
            tool: BRIDGE_TOOL.to_string(),
            arguments: BridgeArguments { operation, args },
            context: self.identity.clone(),
        }
    }

    /// Send one operation to the bridge and return its `result` mapping.
    ///
    /// The response body is fully consumed or dropped before returning, on
    /// every path.
    pub async fn call(
        &self,
        operation: GitOperation,
        args: Map<String, Value>,
    ) -> Result<Value, BridgeError> {
        let result = self.call_inner(operation, args).await;
        if let Err(e) = &result {
            tracing::error!("Failed to call MCP git_tool via bridge: {}", e);
        }
        result
    }

    async fn call_inner(
        &self,
        operation: GitOperation,
        args: Map<String, Value>,
    ) -> Result<Value, BridgeError> {
        let url = format!("{}{}", self.backend_url, BRIDGE_PATH);
        let request = self.build_request(operation, args);
        tracing::debug!("MCP bridge call: {} → {}", operation, url);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(operation, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::Transport {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        let envelope: BridgeResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.request_error(operation, e)
            } else {
                BridgeError::InvalidResponse {
                    operation,
                    source: e,
                }
            }
        })?;

        if !envelope.success {
            return Err(BridgeError::Rejected {
                operation,
                message: envelope.error_message(),
            });
        }

        Ok(envelope
            .result
            .filter(|v| !v.is_null())
            .unwrap_or_else(|| Value::Object(Map::new())))
    }

    fn request_error(&self, operation: GitOperation, e: reqwest::Error) -> BridgeError {
        if e.is_timeout() {
            BridgeError::Timeout {
                operation,
                timeout: self.timeout,
            }
        } else {
            BridgeError::Unavailable {
                operation,
                source: e,
            }
        }
    }

    pub async fn send(&self, command: GitCommand) -> Result<Value, BridgeError> {
        self.call(command.operation(), command.args()).await
    }

    // --- per-operation helpers ---

    pub async fn status(&self) -> Result<Value, BridgeError> {
        self.send(GitCommand::Status).await
    }

    pub async fn branch(&self) -> Result<Value, BridgeError> {
        self.send(GitCommand::Branch).await
    }

    pub async fn log(&self, limit: u32) -> Result<Value, BridgeError> {
        self.send(GitCommand::Log { limit }).await
    }

    pub async fn diff(&self, staged: bool, page: u32, page_size: u32) -> Result<Value, BridgeError> {
        self.send(GitCommand::Diff {
            staged,
            page,
            page_size,
        })
        .await
    }

    pub async fn add(&self, files: &[String]) -> Result<Value, BridgeError> {
        self.send(GitCommand::Add {
            files: files.to_vec(),
        })
        .await
    }

    pub async fn commit(&self, message: &str) -> Result<Value, BridgeError> {
        self.send(GitCommand::Commit {
            message: message.to_string(),
        })
        .await
    }

    pub async fn push(
        &self,
        remote: &str,
        branch: Option<&str>,
        force: bool,
    ) -> Result<Value, BridgeError> {
        self.send(GitCommand::Push {
            remote: remote.to_string(),
            branch: branch.map(String::from),
            force,
        })
        .await
    }

    pub async fn pull(&self, remote: &str, branch: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Pull {
            remote: remote.to_string(),
            branch: branch.map(String::from),
        })
        .await
    }

    pub async fn checkout(&self, branch: &str) -> Result<Value, BridgeError> {
        self.send(GitCommand::Checkout {
            branch: branch.to_string(),
        })
        .await
    }

    pub async fn merge(&self, branch: &str) -> Result<Value, BridgeError> {
        self.send(GitCommand::Merge {
            branch: branch.to_string(),
        })
        .await
    }

    pub async fn rebase(&self, branch: &str) -> Result<Value, BridgeError> {
        self.send(GitCommand::Rebase {
            branch: branch.to_string(),
        })
        .await
    }

    /// `mode` defaults to `mixed` when `None`.
    pub async fn reset(&self, mode: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Reset {
            mode: mode.unwrap_or(DEFAULT_RESET_MODE).to_string(),
        })
        .await
    }

    /// `action` defaults to `push` when `None`.
    pub async fn stash(&self, action: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Stash {
            action: action.unwrap_or(DEFAULT_STASH_ACTION).to_string(),
        })
        .await
    }

    pub async fn tag(&self, name: &str) -> Result<Value, BridgeError> {
        self.send(GitCommand::Tag {
            name: name.to_string(),
        })
        .await
    }

    /// `action` defaults to `list` when `None`.
    pub async fn remote(&self, action: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Remote {
            action: action.unwrap_or(DEFAULT_REMOTE_ACTION).to_string(),
        })
        .await
    }

    /// `remote` defaults to `origin` when `None`.
    pub async fn fetch(&self, remote: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Fetch {
            remote: remote.unwrap_or(DEFAULT_REMOTE).to_string(),
        })
        .await
    }

    pub async fn clone_repo(&self, url: &str, directory: Option<&str>) -> Result<Value, BridgeError> {
        self.send(GitCommand::Clone {
            url: url.to_string(),
            directory: directory.map(String::from),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitBridgeClient {
        GitBridgeClient::with_backend_url(&server.uri()).expect("valid client")
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let c = GitBridgeClient::with_backend_url("http://localhost:8000/").unwrap();
        assert_eq!(c.backend_url(), "http://localhost:8000");
        assert_eq!(c.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_request_envelope_shape() {
        let c = GitBridgeClient::with_backend_url("http://localhost:8000").unwrap();
        let request = c.build_request(GitOperation::Log, GitCommand::Log { limit: 5 }.args());
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "tool": "git_tool",
                "arguments": {"operation": "log", "args": {"limit": 5}},
                "context": {"user_id": "ai-tool-calling", "user_role": "user"}
            })
        );
    }

    #[tokio::test]
    async fn test_diff_posts_exact_args() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/mcp-bridge/tools/call"))
            .and(body_json(json!({
                "tool": "git_tool",
                "arguments": {
                    "operation": "diff",
                    "args": {"staged": true, "page": 2, "page_size": 50}
                },
                "context": {"user_id": "ai-tool-calling", "user_role": "user"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "result": {"diff": "+line", "page": 2}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client(&server).diff(true, 2, 50).await.unwrap();
        assert_eq!(result["diff"], json!("+line"));
    }

    #[tokio::test]
    async fn test_defaulted_helpers_send_default_args() {
        let server = MockServer::start().await;
        for (operation, args) in [
            ("reset", json!({"mode": "mixed"})),
            ("stash", json!({"action": "push"})),
            ("remote", json!({"action": "list"})),
            ("fetch", json!({"remote": "origin"})),
        ] {
            Mock::given(method("POST"))
                .and(body_json(json!({
                    "tool": "git_tool",
                    "arguments": {"operation": operation, "args": args},
                    "context": {"user_id": "ai-tool-calling", "user_role": "user"}
                })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let c = client(&server);
        c.reset(None).await.unwrap();
        c.stash(None).await.unwrap();
        c.remote(None).await.unwrap();
        c.fetch(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_carries_upstream_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "error": "conflict"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).merge("feature").await.unwrap_err();
        match &err {
            BridgeError::Rejected { operation, message } => {
                assert_eq!(*operation, GitOperation::Merge);
                assert_eq!(message, "conflict");
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
        assert!(err.to_string().contains("conflict"));
    }

    #[tokio::test]
    async fn test_rejected_without_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let err = client(&server).status().await.unwrap_err();
        assert!(err.to_string().contains("Unknown error"));
    }

    #[tokio::test]
    async fn test_structured_error_keeps_upstream_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": {"code": "E_CONFLICT", "detail": "merge conflict in labels.json"}
            })))
            .mount(&server)
            .await;

        let err = client(&server).pull("origin", None).await.unwrap_err();
        match &err {
            BridgeError::Rejected { message, .. } => {
                assert!(message.contains("E_CONFLICT"), "{message}");
                assert!(message.contains("merge conflict in labels.json"));
            }
            other => panic!("Expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_200_is_transport_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client(&server).fetch(None).await.unwrap_err();
        match err {
            BridgeError::Transport { status, body, .. } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("Expected Transport, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_result_is_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let result = client(&server).tag("v1.0").await.unwrap();
        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn test_garbage_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server).log(3).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_slow_bridge_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": true, "result": {}}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let c = GitBridgeClient::new(&BridgeConfig {
            backend_url: server.uri(),
            timeout_secs: 1,
            ..BridgeConfig::default()
        })
        .unwrap();
        let err = c.status().await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_bridge_is_unavailable() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let c = GitBridgeClient::with_backend_url("http://127.0.0.1:9").unwrap();
        let err = c.status().await.unwrap_err();
        assert!(matches!(err, BridgeError::Unavailable { .. }), "got {err:?}");
    }
}
