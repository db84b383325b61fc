//! Git operations exposed as executor tools.
//!
//! Read operations require `read`, anything that changes the repository
//! requires `write`. Failures from the bridge come back as `ToolError`s and
//! are normalized by the executor like any other tool failure.

use crate::client::GitBridgeClient;
use crate::operations::{DEFAULT_DIFF_PAGE, DEFAULT_DIFF_PAGE_SIZE, DEFAULT_LOG_LIMIT, DEFAULT_REMOTE};
use reynard_core::permissions::{READ_PERMISSION, WRITE_PERMISSION};
use reynard_core::{
    FnTool, ParameterType, ToolBuilder, ToolDefinitionError, ToolError, ToolParameter,
    ToolRegistry, ToolResult,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Read a non-negative integer argument that fits in `u32`.
fn u32_arg(args: &Map<String, Value>, key: &str) -> Result<u32, String> {
    args.get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| format!("'{key}' must be a non-negative integer"))
}

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

fn to_result(outcome: Result<Value, crate::BridgeError>) -> Result<ToolResult, ToolError> {
    outcome.map(ToolResult::ok).map_err(ToolError::from)
}

pub fn git_status(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_status")
        .description("Show the working tree status")
        .requires_permission(READ_PERMISSION)
        .handler(move |_args, _ctx| {
            let client = client.clone();
            async move { to_result(client.status().await) }
        })
        .build()
}

pub fn git_branches(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_branches")
        .description("List branches and the current branch")
        .requires_permission(READ_PERMISSION)
        .handler(move |_args, _ctx| {
            let client = client.clone();
            async move { to_result(client.branch().await) }
        })
        .build()
}

pub fn git_history(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_history")
        .description("Show recent commits")
        .param(ToolParameter::optional(
            "limit",
            ParameterType::Integer,
            DEFAULT_LOG_LIMIT,
            "Maximum number of commits",
        ))
        .requires_permission(READ_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let limit = match u32_arg(&args, "limit") {
                    Ok(n) => n,
                    Err(msg) => return Ok(ToolResult::failure(msg)),
                };
                to_result(client.log(limit).await)
            }
        })
        .build()
}

pub fn git_diff(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_diff")
        .description("Show changes, paginated")
        .params([
            ToolParameter::optional(
                "staged",
                ParameterType::Boolean,
                false,
                "Diff the index instead of the working tree",
            ),
            ToolParameter::optional("page", ParameterType::Integer, DEFAULT_DIFF_PAGE, "Page number"),
            ToolParameter::optional(
                "page_size",
                ParameterType::Integer,
                DEFAULT_DIFF_PAGE_SIZE,
                "Lines per page",
            ),
        ])
        .requires_permission(READ_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let staged = args.get("staged").and_then(Value::as_bool).unwrap_or(false);
                let (page, page_size) = match (u32_arg(&args, "page"), u32_arg(&args, "page_size")) {
                    (Ok(p), Ok(s)) => (p, s),
                    (Err(msg), _) | (_, Err(msg)) => return Ok(ToolResult::failure(msg)),
                };
                to_result(client.diff(staged, page, page_size).await)
            }
        })
        .build()
}

pub fn git_add(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_add")
        .description("Stage files for commit")
        .param(ToolParameter::required(
            "files",
            ParameterType::Array,
            "Paths to stage",
        ))
        .requires_permission(WRITE_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let files: Option<Vec<String>> = args
                    .get("files")
                    .and_then(Value::as_array)
                    .and_then(|items| items.iter().map(|v| v.as_str().map(String::from)).collect());
                match files {
                    Some(files) => to_result(client.add(&files).await),
                    None => Ok(ToolResult::failure("'files' must be an array of strings")),
                }
            }
        })
        .build()
}

pub fn git_commit(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_commit")
        .description("Commit staged changes")
        .param(ToolParameter::required(
            "message",
            ParameterType::String,
            "Commit message",
        ))
        .requires_permission(WRITE_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let message = str_arg(&args, "message");
                if message.trim().is_empty() {
                    return Ok(ToolResult::failure("Commit message must not be empty"));
                }
                to_result(client.commit(message).await)
            }
        })
        .build()
}

pub fn git_push(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_push")
        .description("Push commits to a remote")
        .params([
            ToolParameter::optional("remote", ParameterType::String, DEFAULT_REMOTE, "Remote name"),
            ToolParameter::optional(
                "branch",
                ParameterType::String,
                "",
                "Branch to push; empty pushes the current branch",
            ),
            ToolParameter::optional("force", ParameterType::Boolean, false, "Force push"),
        ])
        .requires_permission(WRITE_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let force = args.get("force").and_then(Value::as_bool).unwrap_or(false);
                let outcome = client
                    .push(
                        str_arg(&args, "remote"),
                        non_empty(str_arg(&args, "branch")),
                        force,
                    )
                    .await;
                to_result(outcome)
            }
        })
        .build()
}

pub fn git_pull(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_pull")
        .description("Pull changes from a remote")
        .params([
            ToolParameter::optional("remote", ParameterType::String, DEFAULT_REMOTE, "Remote name"),
            ToolParameter::optional(
                "branch",
                ParameterType::String,
                "",
                "Branch to pull; empty uses the tracking branch",
            ),
        ])
        .requires_permission(WRITE_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move {
                let outcome = client
                    .pull(str_arg(&args, "remote"), non_empty(str_arg(&args, "branch")))
                    .await;
                to_result(outcome)
            }
        })
        .build()
}

pub fn git_checkout(client: Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("git_checkout")
        .description("Switch to a branch")
        .param(ToolParameter::required(
            "branch",
            ParameterType::String,
            "Branch to check out",
        ))
        .requires_permission(WRITE_PERMISSION)
        .handler(move |args, _ctx| {
            let client = client.clone();
            async move { to_result(client.checkout(str_arg(&args, "branch")).await) }
        })
        .build()
}

/// Register every git tool, all sharing `client`.
pub fn register_git_tools(
    registry: &mut ToolRegistry,
    client: Arc<GitBridgeClient>,
) -> Result<(), ToolDefinitionError> {
    let builders: [fn(Arc<GitBridgeClient>) -> Result<FnTool, ToolDefinitionError>; 9] = [
        git_status,
        git_branches,
        git_history,
        git_diff,
        git_add,
        git_commit,
        git_push,
        git_pull,
        git_checkout,
    ];
    for build in builders {
        registry.register(Arc::new(build(client.clone())?));
    }
    tracing::info!("Registered {} git bridge tools", builders.len());
    Ok(())
}
