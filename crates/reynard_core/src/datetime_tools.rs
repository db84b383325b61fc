//! Local date/time tools. Pure functions of the clock, no permission needed.

use crate::builder::{FnTool, ToolBuilder};
use crate::error::ToolDefinitionError;
use crate::tools::{ParameterType, ToolParameter, ToolResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde_json::json;

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// `get_current_time {format, utc}`
pub fn get_current_time_tool() -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("get_current_time")
        .description("Get the current date and time")
        .param(ToolParameter::optional(
            "format",
            ParameterType::String,
            DEFAULT_TIME_FORMAT,
            "strftime-style format string",
        ))
        .param(ToolParameter::optional(
            "utc",
            ParameterType::Boolean,
            true,
            "Report UTC instead of the server's local time",
        ))
        .handler(|args, _ctx| async move {
            let format = args["format"].as_str().unwrap_or(DEFAULT_TIME_FORMAT);
            if !valid_format(format) {
                return Ok(ToolResult::failure(format!("Invalid time format: {format}")));
            }
            let use_utc = args["utc"].as_bool().unwrap_or(true);
            let (timestamp, formatted, timezone) = if use_utc {
                let now = Utc::now();
                (now.timestamp(), now.format(format).to_string(), "UTC".to_string())
            } else {
                let now = Local::now();
                (
                    now.timestamp(),
                    now.format(format).to_string(),
                    now.offset().to_string(),
                )
            };
            Ok(ToolResult::ok(json!({
                "timestamp": timestamp,
                "formatted": formatted,
                "timezone": timezone,
            })))
        })
        .build()
}

/// `format_time {timestamp, format}`; timestamps are Unix seconds, UTC.
pub fn format_time_tool() -> Result<FnTool, ToolDefinitionError> {
    ToolBuilder::new("format_time")
        .description("Format a Unix timestamp as a date/time string")
        .param(ToolParameter::required(
            "timestamp",
            ParameterType::Integer,
            "Unix timestamp in seconds",
        ))
        .param(ToolParameter::optional(
            "format",
            ParameterType::String,
            DEFAULT_TIME_FORMAT,
            "strftime-style format string",
        ))
        .handler(|args, _ctx| async move {
            let format = args["format"].as_str().unwrap_or(DEFAULT_TIME_FORMAT);
            if !valid_format(format) {
                return Ok(ToolResult::failure(format!("Invalid time format: {format}")));
            }
            let Some(secs) = args["timestamp"].as_i64() else {
                return Ok(ToolResult::failure("Timestamp out of range"));
            };
            let Some(dt) = DateTime::<Utc>::from_timestamp(secs, 0) else {
                return Ok(ToolResult::failure(format!("Timestamp out of range: {secs}")));
            };
            Ok(ToolResult::ok(json!({
                "timestamp": secs,
                "formatted": dt.format(format).to_string(),
            })))
        })
        .build()
}
