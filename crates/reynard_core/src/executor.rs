//! The single choke point every tool invocation passes through.
//!
//! `ToolExecutor::execute` looks the tool up, validates arguments, checks
//! permissions, runs the handler under a timeout and folds every outcome,
//! including handler panics, into a `ToolResult`.

use crate::config::{ExecutorConfig, ReynardConfig};
use crate::error::ToolError;
use crate::permissions::PermissionPolicy;
use crate::registry::{Registration, ToolRegistry};
use crate::tools::{ToolDescriptor, ToolExecutionContext, ToolHandler, ToolResult};
use crate::validation::validate_arguments;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct ToolExecutor {
    registry: Arc<RwLock<ToolRegistry>>,
    policy: PermissionPolicy,
    config: ExecutorConfig,
}

impl ToolExecutor {
    pub fn new(config: &ReynardConfig) -> Self {
        Self::with_registry(Arc::new(RwLock::new(ToolRegistry::new())), config)
    }

    pub fn with_registry(registry: Arc<RwLock<ToolRegistry>>, config: &ReynardConfig) -> Self {
        Self {
            registry,
            policy: PermissionPolicy::new(&config.permissions),
            config: config.executor.clone(),
        }
    }

    /// Shared handle to the registry this executor dispatches through.
    pub fn registry(&self) -> Arc<RwLock<ToolRegistry>> {
        self.registry.clone()
    }

    pub fn policy(&self) -> &PermissionPolicy {
        &self.policy
    }

    pub async fn register(&self, tool: Arc<dyn ToolHandler>) -> Registration {
        self.registry.write().await.register(tool)
    }

    /// Descriptors of the tools `context` is allowed to call.
    pub async fn available_tools(&self, context: &ToolExecutionContext) -> Vec<ToolDescriptor> {
        self.registry
            .read()
            .await
            .list()
            .filter(|d| {
                self.policy
                    .check(&context.user_role, d.required_permission.as_deref())
                    .is_ok()
            })
            .collect()
    }

    /// Execute a tool by name. Never fails: every error becomes a
    /// `ToolResult` with `success == false` and a populated `error_kind`.
    #[tracing::instrument(skip(self, args, context), fields(tool = %name, user = %context.user_id))]
    pub async fn execute(
        &self,
        name: &str,
        args: Value,
        context: &ToolExecutionContext,
    ) -> ToolResult {
        let execution_id = Uuid::new_v4();
        let started = Instant::now();

        let outcome = self.run(name, args, context).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let mut result = match outcome {
            Ok(result) => {
                tracing::info!(
                    "Tool '{}' finished in {}ms (success={})",
                    name,
                    elapsed_ms,
                    result.success
                );
                result
            }
            Err(e) => {
                tracing::warn!("Tool '{}' failed after {}ms: {}", name, elapsed_ms, e);
                let kind = e.kind();
                ToolResult::from_error(kind, describe_failure(name, &e))
                    .with_metadata("error_type", kind.as_str())
            }
        };

        result.metadata.insert("tool".into(), name.into());
        result
            .metadata
            .insert("execution_id".into(), execution_id.to_string().into());
        result
            .metadata
            .insert("execution_time_ms".into(), elapsed_ms.into());
        result
            .metadata
            .insert("user_id".into(), context.user_id.clone().into());
        result
            .metadata
            .insert("user_role".into(), context.user_role.clone().into());
        result
    }

    async fn run(
        &self,
        name: &str,
        args: Value,
        context: &ToolExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        // Clone the Arc out so the read lock is released before the handler runs.
        let tool = self
            .registry
            .read()
            .await
            .lookup(name)
            .ok_or_else(|| ToolError::NotFound {
                name: name.to_string(),
            })?;

        let validated = validate_arguments(tool.parameters(), &args)?;
        self.policy
            .check(&context.user_role, tool.required_permission())?;

        let budget = self.config.timeout_for(name);
        let ctx = context.clone();
        let task = tokio::spawn(async move { tool.execute(&validated, &ctx).await });
        let abort = task.abort_handle();

        match tokio::time::timeout(budget, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) if join_err.is_panic() => Err(ToolError::execution(format!(
                "handler panicked: {}",
                panic_message(join_err.into_panic())
            ))),
            Ok(Err(join_err)) => Err(ToolError::execution(format!(
                "handler task cancelled: {join_err}"
            ))),
            Err(_) => {
                // Whatever the task produces from here on is dropped.
                abort.abort();
                Err(ToolError::timeout(budget))
            }
        }
    }
}

fn describe_failure(name: &str, err: &ToolError) -> String {
    match err {
        ToolError::NotFound { .. } => format!("Tool '{name}' not found"),
        ToolError::Validation(e) => format!("Invalid arguments for tool '{name}': {e}"),
        ToolError::PermissionDenied { .. } => {
            format!("Permission denied for tool '{name}': {err}")
        }
        ToolError::Timeout { .. } => format!("Tool '{name}' failed: {err}"),
        ToolError::Execution(msg) => format!("Tool '{name}' failed: {msg}"),
        ToolError::Resource(_) => format!("Tool '{name}' failed: {err}"),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
