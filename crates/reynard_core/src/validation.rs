//! Argument validation against a tool's declared parameters.
//!
//! Validation is strict: keys the schema does not declare are rejected
//! rather than silently forwarded. A tool that wants to accept a new key
//! must declare it first.

use crate::error::ValidationError;
use crate::tools::{json_type_name, ToolParameter};
use serde_json::{Map, Value};

/// Check `args` against `params` and return the argument map with defaults
/// filled in.
///
/// `null` is treated as "no arguments". An explicit `null` for a parameter
/// counts as missing, so optional parameters get their default and required
/// ones fail. Checks run in a fixed order (declared parameters first, in
/// declaration order, then unknown keys in key order), so the same input
/// always reports the same error.
pub fn validate_arguments(
    params: &[ToolParameter],
    args: &Value,
) -> Result<Map<String, Value>, ValidationError> {
    let empty = Map::new();
    let supplied = match args {
        Value::Null => &empty,
        Value::Object(map) => map,
        other => {
            return Err(ValidationError::NotAnObject {
                received: json_type_name(other).to_string(),
            })
        }
    };

    let mut validated = Map::with_capacity(params.len());

    for param in params {
        match supplied.get(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(ValidationError::Missing {
                        parameter: param.name.clone(),
                    });
                }
                if let Some(default) = &param.default {
                    validated.insert(param.name.clone(), default.clone());
                }
            }
            Some(value) => {
                if !param.param_type.matches(value) {
                    return Err(ValidationError::TypeMismatch {
                        parameter: param.name.clone(),
                        expected: param.param_type.to_string(),
                        received: json_type_name(value).to_string(),
                    });
                }
                validated.insert(param.name.clone(), value.clone());
            }
        }
    }

    let mut unknown: Vec<&String> = supplied
        .keys()
        .filter(|k| !params.iter().any(|p| p.name == **k))
        .collect();
    unknown.sort();
    if let Some(key) = unknown.first() {
        return Err(ValidationError::Unknown {
            parameter: (*key).clone(),
        });
    }

    Ok(validated)
}
