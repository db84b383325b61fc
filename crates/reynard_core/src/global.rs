//! Process-wide executor instance.
//!
//! Components that can take an explicit `Arc<ToolExecutor>` should; these
//! accessors exist for call sites that have no handle to thread through.

use crate::config::ReynardConfig;
use crate::executor::ToolExecutor;
use crate::registry::{Registration, ToolRegistry};
use crate::tools::ToolHandler;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tokio::sync::RwLock;

static TOOL_EXECUTOR: OnceCell<Arc<ToolExecutor>> = OnceCell::new();

/// Create the shared executor from `config`.
///
/// Only the first call takes effect; later calls log a warning and return
/// the instance that already exists.
pub fn initialize_tool_executor(config: &ReynardConfig) -> Arc<ToolExecutor> {
    let mut created = false;
    let executor = TOOL_EXECUTOR.get_or_init(|| {
        created = true;
        Arc::new(ToolExecutor::new(config))
    });
    if !created {
        tracing::warn!("Tool executor already initialized, ignoring new config");
    }
    executor.clone()
}

/// The shared executor, created with default config on first access.
pub fn get_tool_executor() -> Arc<ToolExecutor> {
    TOOL_EXECUTOR
        .get_or_init(|| Arc::new(ToolExecutor::new(&ReynardConfig::default())))
        .clone()
}

/// Registry behind the shared executor.
pub fn get_tool_registry() -> Arc<RwLock<ToolRegistry>> {
    get_tool_executor().registry()
}

/// Register a tool with the shared executor.
pub async fn register_tool(tool: Arc<dyn ToolHandler>) -> Registration {
    get_tool_executor().register(tool).await
}
