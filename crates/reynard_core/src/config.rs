use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReynardConfig {
    pub executor: ExecutorConfig,
    pub permissions: PermissionConfig,
    pub bridge: BridgeConfig,
}

impl ReynardConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: ReynardConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("REYNARD_BACKEND_URL") {
            self.bridge.backend_url = v;
        }
        if let Ok(v) = std::env::var("REYNARD_BRIDGE_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                self.bridge.timeout_secs = n;
            }
        }
        if let Ok(v) = std::env::var("REYNARD_TOOL_TIMEOUT_SECS") {
            if let Ok(n) = v.parse() {
                self.executor.default_timeout_secs = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Budget for a single tool invocation.
    pub default_timeout_secs: u64,
    /// Per-tool overrides of `default_timeout_secs`, keyed by tool name.
    pub tool_timeouts: HashMap<String, u64>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: 30,
            tool_timeouts: HashMap::new(),
        }
    }
}

impl ExecutorConfig {
    pub fn timeout_for(&self, tool: &str) -> Duration {
        let secs = self
            .tool_timeouts
            .get(tool)
            .copied()
            .unwrap_or(self.default_timeout_secs);
        Duration::from_secs(secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Role name → permissions granted to that role.
    pub roles: HashMap<String, Vec<String>>,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        let roles = [
            ("admin", vec!["admin", "write", "read"]),
            ("user", vec!["write", "read"]),
            ("readonly", vec!["read"]),
        ]
        .into_iter()
        .map(|(role, perms)| {
            (
                role.to_string(),
                perms.into_iter().map(String::from).collect(),
            )
        })
        .collect();
        Self { roles }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base URL of the backend hosting `/api/mcp-bridge/tools/call`.
    pub backend_url: String,
    pub timeout_secs: u64,
    /// Identity reported to the bridge on every call.
    pub user_id: String,
    pub user_role: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            user_id: "ai-tool-calling".to_string(),
            user_role: "user".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
