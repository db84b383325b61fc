//! Integration tests for ToolExecutor.
//!
//! Tools are built with ToolBuilder and counters/flags record whether the
//! handler actually ran, so we can assert on side effects as well as on the
//! returned ToolResult.

use reynard_core::config::ReynardConfig;
use reynard_core::{
    ParameterType, ToolBuilder, ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutor,
    ToolParameter, ToolResult,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Helpers
// ============================================================================

fn user() -> ToolExecutionContext {
    ToolExecutionContext::new("alice", "user")
}

fn admin() -> ToolExecutionContext {
    ToolExecutionContext::new("root", "admin")
}

fn counting_tool(name: &str, calls: Arc<AtomicUsize>) -> ToolBuilder {
    ToolBuilder::new(name).handler(move |args, _ctx| {
        let calls = calls.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(ToolResult::ok(Value::Object(args)))
        }
    })
}

// ============================================================================
// Lookup & validation
// ============================================================================

#[tokio::test]
async fn test_unknown_tool_is_not_found() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let result = exec.execute("does_not_exist", json!({}), &user()).await;
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ToolErrorKind::NotFound));
    assert!(result.error.unwrap().contains("does_not_exist"));
}

#[tokio::test]
async fn test_missing_required_parameter_is_named() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(
        counting_tool("list_files", calls.clone())
            .param(ToolParameter::required("path", ParameterType::String, "Directory"))
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec.execute("list_files", json!({}), &user()).await;
    assert_eq!(result.error_kind, Some(ToolErrorKind::Validation));
    assert!(result.error.unwrap().contains("'path'"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_extra_key_rejected_with_key_named() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(
        counting_tool("list_files", calls.clone())
            .param(ToolParameter::required("path", ParameterType::String, "Directory"))
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec
        .execute("list_files", json!({"path": "/", "hidden": true}), &user())
        .await;
    assert_eq!(result.error_kind, Some(ToolErrorKind::Validation));
    assert!(result.error.unwrap().contains("'hidden'"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_handler_receives_defaults() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(
        counting_tool("list_files", calls)
            .param(ToolParameter::required("path", ParameterType::String, "Directory"))
            .param(ToolParameter::optional("limit", ParameterType::Integer, 100, "Max"))
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec
        .execute("list_files", json!({"path": "/home"}), &user())
        .await;
    assert!(result.success);
    assert_eq!(result.data, Some(json!({"path": "/home", "limit": 100})));
}

// ============================================================================
// Permissions
// ============================================================================

#[tokio::test]
async fn test_admin_tool_denied_for_user_without_side_effect() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(
        counting_tool("drop_dataset", calls.clone())
            .admin()
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec.execute("drop_dataset", json!({}), &user()).await;
    assert!(!result.success);
    assert_eq!(result.error_kind, Some(ToolErrorKind::Permission));
    assert_eq!(calls.load(Ordering::SeqCst), 0, "handler must not run");

    let result = exec.execute("drop_dataset", json!({}), &admin()).await;
    assert!(result.success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_read_only_tool_allowed_for_readonly_role() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(
        counting_tool("peek", calls.clone()).read_only().build().unwrap(),
    ))
    .await;

    let ctx = ToolExecutionContext::new("bob", "readonly");
    assert!(exec.execute("peek", json!({}), &ctx).await.success);
}

// ============================================================================
// Timeouts & failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_handler_times_out_and_late_result_is_discarded() {
    let mut config = ReynardConfig::default();
    config.executor.default_timeout_secs = 30;
    config.executor.tool_timeouts.insert("slow".into(), 2);
    let exec = ToolExecutor::new(&config);

    let finished = Arc::new(AtomicBool::new(false));
    let flag = finished.clone();
    exec.register(Arc::new(
        ToolBuilder::new("slow")
            .handler(move |_, _| {
                let flag = flag.clone();
                async move {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    flag.store(true, Ordering::SeqCst);
                    Ok(ToolResult::ok(json!("too late")))
                }
            })
            .build()
            .unwrap(),
    ))
    .await;

    let started = tokio::time::Instant::now();
    let result = exec.execute("slow", json!({}), &user()).await;
    let waited = started.elapsed();

    assert_eq!(result.error_kind, Some(ToolErrorKind::Timeout));
    assert!(result.data.is_none());
    assert!(waited >= Duration::from_secs(2));
    assert!(waited < Duration::from_secs(3), "returned after {waited:?}");

    // Let the abandoned handler's deadline pass: it was aborted, so it never completes.
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_handler_panic_becomes_execution_error() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    exec.register(Arc::new(
        ToolBuilder::new("broken")
            .handler(|_, _| async {
                if true {
                    panic!("index out of bounds");
                }
                Ok(ToolResult::ok(json!(null)))
            })
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec.execute("broken", json!({}), &admin()).await;
    assert_eq!(result.error_kind, Some(ToolErrorKind::Execution));
    assert!(result.error.unwrap().contains("index out of bounds"));
    assert_eq!(result.metadata["user_role"], json!("admin"));
}

#[tokio::test]
async fn test_execution_error_message_preserved() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    exec.register(Arc::new(
        ToolBuilder::new("push")
            .handler(|_, _| async { Err(ToolError::execution("remote rejected: conflict")) })
            .build()
            .unwrap(),
    ))
    .await;

    let result = exec.execute("push", json!({}), &user()).await;
    assert_eq!(result.error_kind, Some(ToolErrorKind::Execution));
    let error = result.error.unwrap();
    assert!(error.contains("conflict"));
    assert!(error.contains("push"));
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_reregistration_uses_new_handler() {
    let exec = ToolExecutor::new(&ReynardConfig::default());
    for version in ["v1", "v2"] {
        exec.register(Arc::new(
            ToolBuilder::new("version")
                .handler(move |_, _| async move { Ok(ToolResult::ok(json!(version))) })
                .build()
                .unwrap(),
        ))
        .await;
    }

    let result = exec.execute("version", json!({}), &user()).await;
    assert_eq!(result.data, Some(json!("v2")));
}

#[tokio::test]
async fn test_concurrent_executions() {
    let exec = Arc::new(ToolExecutor::new(&ReynardConfig::default()));
    let calls = Arc::new(AtomicUsize::new(0));
    exec.register(Arc::new(counting_tool("count", calls.clone()).build().unwrap()))
        .await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let exec = exec.clone();
            tokio::spawn(async move { exec.execute("count", json!({}), &user()).await })
        })
        .collect();
    for h in handles {
        assert!(h.await.unwrap().success);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 16);
}
