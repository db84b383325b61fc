use crate::tools::ToolErrorKind;
use std::time::Duration;

/// Reason a set of arguments does not satisfy a tool's parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("arguments must be a JSON object, got {received}")]
    NotAnObject { received: String },

    #[error("missing required parameter '{parameter}'")]
    Missing { parameter: String },

    #[error("parameter '{parameter}' expects {expected}, got {received}")]
    TypeMismatch {
        parameter: String,
        expected: String,
        received: String,
    },

    #[error("unknown parameter '{parameter}'")]
    Unknown { parameter: String },
}

impl ValidationError {
    /// Name of the offending parameter, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            ValidationError::NotAnObject { .. } => None,
            ValidationError::Missing { parameter }
            | ValidationError::TypeMismatch { parameter, .. }
            | ValidationError::Unknown { parameter } => Some(parameter),
        }
    }
}

/// Every way a tool invocation can fail. The executor converts all of them
/// into a `ToolResult`; none cross its boundary.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("tool '{name}' not found")]
    NotFound { name: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("role '{role}' lacks permission '{required}'")]
    PermissionDenied { required: String, role: String },

    #[error("{message}")]
    Timeout { after: Duration, message: String },

    #[error("{0}")]
    Execution(String),

    #[error("resource unavailable: {0}")]
    Resource(String),
}

impl ToolError {
    pub fn execution(msg: impl Into<String>) -> Self {
        ToolError::Execution(msg.into())
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        ToolError::Resource(msg.into())
    }

    /// Timeout with the default message.
    pub fn timeout(after: Duration) -> Self {
        ToolError::Timeout {
            after,
            message: format!("timed out after {}s", after.as_secs_f64()),
        }
    }

    pub fn kind(&self) -> ToolErrorKind {
        match self {
            ToolError::NotFound { .. } => ToolErrorKind::NotFound,
            ToolError::Validation(_) => ToolErrorKind::Validation,
            ToolError::PermissionDenied { .. } => ToolErrorKind::Permission,
            ToolError::Timeout { .. } => ToolErrorKind::Timeout,
            ToolError::Execution(_) => ToolErrorKind::Execution,
            ToolError::Resource(_) => ToolErrorKind::Resource,
        }
    }
}

/// Rejected tool definition, reported by `ToolBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToolDefinitionError {
    #[error("tool name must not be empty")]
    EmptyName,

    #[error("tool '{tool}' has no handler")]
    MissingHandler { tool: String },

    #[error("tool '{tool}' declares parameter '{parameter}' twice")]
    DuplicateParameter { tool: String, parameter: String },

    #[error("optional parameter '{parameter}' of tool '{tool}' has no default")]
    MissingDefault { tool: String, parameter: String },

    #[error("default of parameter '{parameter}' in tool '{tool}' is {received}, declared {expected}")]
    DefaultTypeMismatch {
        tool: String,
        parameter: String,
        expected: String,
        received: String,
    },
}
