//! Tool abstraction types shared by the registry, the executor and every
//! concrete tool (local datetime helpers, git bridge tools, ...).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::error::ToolError;

// ============================================================================
// Parameter schema
// ============================================================================

/// Declared JSON type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Integer => "integer",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
        }
    }

    /// Whether a JSON value satisfies this type.
    ///
    /// `Integer` only accepts values that serde_json stores as integers;
    /// `1.0` is a number but not an integer.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParameterType::String => value.is_string(),
            ParameterType::Integer => value.is_i64() || value.is_u64(),
            ParameterType::Number => value.is_number(),
            ParameterType::Boolean => value.is_boolean(),
            ParameterType::Array => value.is_array(),
            ParameterType::Object => value.is_object(),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type a value actually has, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// One entry of a tool's parameter schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub description: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolParameter {
    /// A parameter the caller must always supply.
    pub fn required(
        name: impl Into<String>,
        param_type: ParameterType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// A parameter that falls back to `default` when omitted.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParameterType,
        default: impl Into<Value>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: false,
            default: Some(default.into()),
        }
    }

    fn json_schema(&self) -> Value {
        let mut schema = json!({
            "type": self.param_type.as_str(),
            "description": self.description,
        });
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

// ============================================================================
// Execution context & result envelope
// ============================================================================

/// Identity snapshot for a single invocation. Tools only ever see `&self`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionContext {
    pub user_id: String,
    pub user_role: String,
    #[serde(default)]
    pub request_metadata: Map<String, Value>,
}

impl ToolExecutionContext {
    pub fn new(user_id: impl Into<String>, user_role: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_role: user_role.into(),
            request_metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request_metadata.insert(key.into(), value.into());
        self
    }
}

/// Classification of a failed execution, serialized as the error class
/// names clients match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolErrorKind {
    #[serde(rename = "ToolNotFoundError")]
    NotFound,
    #[serde(rename = "ToolValidationError")]
    Validation,
    #[serde(rename = "ToolPermissionError")]
    Permission,
    #[serde(rename = "ToolTimeoutError")]
    Timeout,
    #[serde(rename = "ToolExecutionError")]
    Execution,
    #[serde(rename = "ToolResourceError")]
    Resource,
}

impl ToolErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::NotFound => "ToolNotFoundError",
            ToolErrorKind::Validation => "ToolValidationError",
            ToolErrorKind::Permission => "ToolPermissionError",
            ToolErrorKind::Timeout => "ToolTimeoutError",
            ToolErrorKind::Execution => "ToolExecutionError",
            ToolErrorKind::Resource => "ToolResourceError",
        }
    }
}

impl fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform outcome of a tool invocation.
///
/// `data` is only set when `success` is true, `error` only when it is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ToolErrorKind>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ToolResult {
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
            error_kind: None,
            metadata: Map::new(),
        }
    }

    /// An expected failure reported by the tool itself.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: None,
            metadata: Map::new(),
        }
    }

    pub(crate) fn from_error(kind: ToolErrorKind, message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            error_kind: Some(kind),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// ToolHandler trait
// ============================================================================

/// Trait every tool satisfies so the executor can treat them uniformly.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique name used for dispatch.
    fn name(&self) -> &str;

    /// Human-readable description for discovery.
    fn description(&self) -> &str;

    /// Ordered parameter schema; arguments are validated against it before
    /// `execute` is called.
    fn parameters(&self) -> &[ToolParameter];

    /// Permission the caller's role must grant. `None` means any caller.
    fn required_permission(&self) -> Option<&str> {
        None
    }

    /// Run the tool with already validated arguments.
    ///
    /// Expected failures return `Ok(ToolResult::failure(..))`; anything the
    /// tool did not anticipate is an `Err`.
    async fn execute(
        &self,
        args: &Map<String, Value>,
        context: &ToolExecutionContext,
    ) -> Result<ToolResult, ToolError>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters().to_vec(),
            required_permission: self.required_permission().map(String::from),
        }
    }
}

/// Discovery view of a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
}

impl ToolDescriptor {
    /// JSON Schema for the tool input, in the shape LLM tool-use APIs expect.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}
