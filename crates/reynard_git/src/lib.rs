//! Remote git operations: a client for the backend's MCP bridge and the
//! executor tools built on top of it.

pub mod client;
pub mod compat;
pub mod error;
pub mod operations;
pub mod tools;

pub use client::{BridgeIdentity, GitBridgeClient};
pub use compat::{git_add_tool, git_branches_tool, git_commit_tool, git_history_tool, git_status_tool};
pub use error::BridgeError;
pub use operations::{GitCommand, GitOperation};
pub use tools::register_git_tools;
