//! Reynard tool-calling core: tool contract, argument validation,
//! permissions, the registry and the executor that ties them together.

pub mod builder;
pub mod config;
pub mod datetime_tools;
pub mod error;
pub mod executor;
pub mod global;
pub mod permissions;
pub mod registry;
pub mod tools;
pub mod validation;

pub use builder::{FnTool, ToolBuilder};
pub use config::ReynardConfig;
pub use error::{ToolDefinitionError, ToolError, ValidationError};
pub use executor::ToolExecutor;
pub use global::{get_tool_executor, get_tool_registry, initialize_tool_executor, register_tool};
pub use permissions::PermissionPolicy;
pub use registry::{Registration, ToolRegistry};
pub use tools::{
    ParameterType, ToolDescriptor, ToolErrorKind, ToolExecutionContext, ToolHandler,
    ToolParameter, ToolResult,
};
