//! CLI smoke tests: verify basic binary behavior without a live bridge.

use std::process::{Command, Output};

const MISSING_CONFIG: &str = "/tmp/nonexistent_reynard_config_12345.toml";

fn cli_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reynard"));
    cmd.arg("--config").arg(MISSING_CONFIG);
    // Point the bridge at a closed port so no test reaches a real backend.
    cmd.env("REYNARD_BACKEND_URL", "http://127.0.0.1:9");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    assert!(
        stdout(&output).contains("Usage"),
        "Expected usage info in --help output"
    );
}

#[test]
fn test_version_flag() {
    let output = cli_bin().arg("--version").output().expect("failed to run");
    assert!(output.status.success());
    assert!(stdout(&output).contains("reynard"));
}

#[test]
fn test_list_shows_builtin_tools() {
    let output = cli_bin().arg("list").output().expect("failed to run");
    assert!(output.status.success());
    let tools: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert!(names.contains(&"get_current_time"));
    assert!(names.contains(&"format_time"));
    assert!(names.contains(&"git_push"));
}

#[test]
fn test_list_hides_write_tools_from_readonly() {
    let output = cli_bin()
        .args(["list", "--role", "readonly"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("git_status"));
    assert!(!out.contains("git_push"));
}

#[test]
fn test_call_format_time() {
    let output = cli_bin()
        .args(["call", "format_time", "--args", r#"{"timestamp": 0}"#])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["success"], serde_json::json!(true));
    assert!(result["data"].to_string().contains("1970-01-01"));
}

#[test]
fn test_unknown_tool_exits_nonzero() {
    let output = cli_bin()
        .args(["call", "no_such_tool"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["error_kind"], serde_json::json!("ToolNotFoundError"));
}

#[test]
fn test_readonly_push_is_denied() {
    let output = cli_bin()
        .args(["call", "git_push", "--role", "readonly"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
    assert!(stdout(&output).contains("ToolPermissionError"));
}

#[test]
fn test_invalid_args_json_fails() {
    let output = cli_bin()
        .args(["call", "format_time", "--args", "{not json"])
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
}
