//! Declarative tool construction.
//!
//! A `ToolBuilder` collects name, description, parameters and permission,
//! checks the definition once, and produces an immutable `FnTool` that wraps
//! an async closure:
//!
//! ```ignore
//! let tool = ToolBuilder::new("list_files")
//!     .description("List files in a directory")
//!     .param(ToolParameter::required("path", ParameterType::String, "Directory path"))
//!     .param(ToolParameter::optional("limit", ParameterType::Integer, 100, "Max files"))
//!     .read_only()
//!     .handler(|args, _ctx| async move { Ok(ToolResult::ok(json!({"files": [], "count": 0}))) })
//!     .build()?;
//! ```

use crate::error::{ToolDefinitionError, ToolError};
use crate::permissions::{ADMIN_PERMISSION, READ_PERMISSION};
use crate::tools::{json_type_name, ToolExecutionContext, ToolHandler, ToolParameter, ToolResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

type HandlerFn = dyn Fn(Map<String, Value>, ToolExecutionContext) -> BoxFuture<'static, Result<ToolResult, ToolError>>
    + Send
    + Sync;

pub struct ToolBuilder {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    required_permission: Option<String>,
    handler: Option<Arc<HandlerFn>>,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: Vec::new(),
            required_permission: None,
            handler: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn param(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ToolParameter>) -> Self {
        self.parameters.extend(params);
        self
    }

    /// Require an exact permission from the caller's role.
    pub fn requires_permission(mut self, permission: impl Into<String>) -> Self {
        self.required_permission = Some(permission.into());
        self
    }

    /// Only callers whose role grants `admin`.
    pub fn admin(self) -> Self {
        self.requires_permission(ADMIN_PERMISSION)
    }

    /// Any caller with read access; the tool must not modify state.
    pub fn read_only(self) -> Self {
        self.requires_permission(READ_PERMISSION)
    }

    pub fn handler<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Map<String, Value>, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolResult, ToolError>> + Send + 'static,
    {
        self.handler = Some(Arc::new(move |args, ctx| f(args, ctx).boxed()));
        self
    }

    pub fn build(self) -> Result<FnTool, ToolDefinitionError> {
        if self.name.trim().is_empty() {
            return Err(ToolDefinitionError::EmptyName);
        }

        let mut seen = HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(ToolDefinitionError::DuplicateParameter {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }
            if param.required {
                continue;
            }
            match &param.default {
                None => {
                    return Err(ToolDefinitionError::MissingDefault {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                    })
                }
                Some(default) if !param.param_type.matches(default) => {
                    return Err(ToolDefinitionError::DefaultTypeMismatch {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                        expected: param.param_type.to_string(),
                        received: json_type_name(default).to_string(),
                    })
                }
                Some(_) => {}
            }
        }

        let handler = self
            .handler
            .ok_or_else(|| ToolDefinitionError::MissingHandler {
                tool: self.name.clone(),
            })?;

        Ok(FnTool {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            required_permission: self.required_permission,
            handler,
        })
    }
}

/// A tool backed by an async closure. Immutable once built.
pub struct FnTool {
    name: String,
    description: String,
    parameters: Vec<ToolParameter>,
    required_permission: Option<String>,
    handler: Arc<HandlerFn>,
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("required_permission", &self.required_permission)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ToolHandler for FnTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[ToolParameter] {
        &self.parameters
    }

    fn required_permission(&self) -> Option<&str> {
        self.required_permission.as_deref()
    }

    async fn execute(
        &self,
        args: &Map<String, Value>,
        context: &ToolExecutionContext,
    ) -> Result<ToolResult, ToolError> {
        (self.handler)(args.clone(), context.clone()).await
    }
}
