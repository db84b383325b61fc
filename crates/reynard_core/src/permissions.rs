use crate::config::PermissionConfig;
use crate::error::ToolError;
use std::collections::{HashMap, HashSet};
use std::fmt;

pub const ADMIN_PERMISSION: &str = "admin";
pub const WRITE_PERMISSION: &str = "write";
pub const READ_PERMISSION: &str = "read";

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDenied {
    pub required: String,
    pub role: String,
}

impl fmt::Display for PermissionDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Permission denied: role '{}' lacks '{}'",
            self.role, self.required
        )
    }
}

impl std::error::Error for PermissionDenied {}

impl From<PermissionDenied> for ToolError {
    fn from(denied: PermissionDenied) -> Self {
        ToolError::PermissionDenied {
            required: denied.required,
            role: denied.role,
        }
    }
}

// ============================================================================
// PermissionPolicy
// ============================================================================

/// Maps a caller role to the set of permissions it grants.
///
/// A role always grants the permission spelled like itself, so a tool built
/// with `requires_permission("auditor")` accepts the `auditor` role without
/// extra configuration. Unknown roles grant nothing else.
#[derive(Debug, Clone)]
pub struct PermissionPolicy {
    roles: HashMap<String, HashSet<String>>,
}

impl Default for PermissionPolicy {
    fn default() -> Self {
        Self::new(&PermissionConfig::default())
    }
}

impl PermissionPolicy {
    pub fn new(config: &PermissionConfig) -> Self {
        let roles = config
            .roles
            .iter()
            .map(|(role, perms)| (role.clone(), perms.iter().cloned().collect()))
            .collect();
        Self { roles }
    }

    pub fn grants(&self, role: &str, permission: &str) -> bool {
        role == permission
            || self
                .roles
                .get(role)
                .is_some_and(|perms| perms.contains(permission))
    }

    /// Check a tool's requirement against the caller's role.
    pub fn check(&self, role: &str, required: Option<&str>) -> Result<(), PermissionDenied> {
        match required {
            None => Ok(()),
            Some(permission) if self.grants(role, permission) => Ok(()),
            Some(permission) => Err(PermissionDenied {
                required: permission.to_string(),
                role: role.to_string(),
            }),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
