//! Git operations understood by the bridge and the `args` mapping each one
//! sends. All argument shaping lives here so defaults stay in one place.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_RESET_MODE: &str = "mixed";
pub const DEFAULT_STASH_ACTION: &str = "push";
pub const DEFAULT_REMOTE_ACTION: &str = "list";
pub const DEFAULT_LOG_LIMIT: u32 = 10;
pub const DEFAULT_DIFF_PAGE: u32 = 1;
pub const DEFAULT_DIFF_PAGE_SIZE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitOperation {
    Status,
    Add,
    Commit,
    Push,
    Pull,
    Checkout,
    Merge,
    Rebase,
    Reset,
    Stash,
    Tag,
    Remote,
    Fetch,
    Clone,
    Branch,
    Log,
    Diff,
}

impl GitOperation {
    pub const ALL: [GitOperation; 17] = [
        GitOperation::Status,
        GitOperation::Add,
        GitOperation::Commit,
        GitOperation::Push,
        GitOperation::Pull,
        GitOperation::Checkout,
        GitOperation::Merge,
        GitOperation::Rebase,
        GitOperation::Reset,
        GitOperation::Stash,
        GitOperation::Tag,
        GitOperation::Remote,
        GitOperation::Fetch,
        GitOperation::Clone,
        GitOperation::Branch,
        GitOperation::Log,
        GitOperation::Diff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GitOperation::Status => "status",
            GitOperation::Add => "add",
            GitOperation::Commit => "commit",
            GitOperation::Push => "push",
            GitOperation::Pull => "pull",
            GitOperation::Checkout => "checkout",
            GitOperation::Merge => "merge",
            GitOperation::Rebase => "rebase",
            GitOperation::Reset => "reset",
            GitOperation::Stash => "stash",
            GitOperation::Tag => "tag",
            GitOperation::Remote => "remote",
            GitOperation::Fetch => "fetch",
            GitOperation::Clone => "clone",
            GitOperation::Branch => "branch",
            GitOperation::Log => "log",
            GitOperation::Diff => "diff",
        }
    }
}

impl fmt::Display for GitOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified bridge call: the operation plus its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum GitCommand {
    Status,
    Branch,
    Log { limit: u32 },
    Diff { staged: bool, page: u32, page_size: u32 },
    Add { files: Vec<String> },
    Commit { message: String },
    Push { remote: String, branch: Option<String>, force: bool },
    Pull { remote: String, branch: Option<String> },
    Checkout { branch: String },
    Merge { branch: String },
    Rebase { branch: String },
    Reset { mode: String },
    Stash { action: String },
    Tag { name: String },
    Remote { action: String },
    Fetch { remote: String },
    Clone { url: String, directory: Option<String> },
}

impl GitCommand {
    pub fn operation(&self) -> GitOperation {
        match self {
            GitCommand::Status => GitOperation::Status,
            GitCommand::Branch => GitOperation::Branch,
            GitCommand::Log { .. } => GitOperation::Log,
            GitCommand::Diff { .. } => GitOperation::Diff,
            GitCommand::Add { .. } => GitOperation::Add,
            GitCommand::Commit { .. } => GitOperation::Commit,
            GitCommand::Push { .. } => GitOperation::Push,
            GitCommand::Pull { .. } => GitOperation::Pull,
            GitCommand::Checkout { .. } => GitOperation::Checkout,
            GitCommand::Merge { .. } => GitOperation::Merge,
            GitCommand::Rebase { .. } => GitOperation::Rebase,
            GitCommand::Reset { .. } => GitOperation::Reset,
            GitCommand::Stash { .. } => GitOperation::Stash,
            GitCommand::Tag { .. } => GitOperation::Tag,
            GitCommand::Remote { .. } => GitOperation::Remote,
            GitCommand::Fetch { .. } => GitOperation::Fetch,
            GitCommand::Clone { .. } => GitOperation::Clone,
        }
    }

    /// The `args` mapping sent to the bridge.
    ///
    /// Optional values (`branch` for push/pull, `directory` for clone) are
    /// left out entirely when absent or empty, so the bridge applies its own
    /// default instead of receiving `null`.
    pub fn args(&self) -> Map<String, Value> {
        let value = match self {
            GitCommand::Status | GitCommand::Branch => json!({}),
            GitCommand::Log { limit } => json!({ "limit": limit }),
            GitCommand::Diff {
                staged,
                page,
                page_size,
            } => json!({ "staged": staged, "page": page, "page_size": page_size }),
            GitCommand::Add { files } => json!({ "files": files }),
            GitCommand::Commit { message } => json!({ "message": message }),
            GitCommand::Push {
                remote,
                branch,
                force,
            } => {
                let mut v = json!({ "remote": remote, "force": force });
                insert_non_empty(&mut v, "branch", branch);
                v
            }
            GitCommand::Pull { remote, branch } => {
                let mut v = json!({ "remote": remote });
                insert_non_empty(&mut v, "branch", branch);
                v
            }
            GitCommand::Checkout { branch }
            | GitCommand::Merge { branch }
            | GitCommand::Rebase { branch } => json!({ "branch": branch }),
            GitCommand::Reset { mode } => json!({ "mode": mode }),
            GitCommand::Stash { action } | GitCommand::Remote { action } => {
                json!({ "action": action })
            }
            GitCommand::Tag { name } => json!({ "name": name }),
            GitCommand::Fetch { remote } => json!({ "remote": remote }),
            GitCommand::Clone { url, directory } => {
                let mut v = json!({ "url": url });
                insert_non_empty(&mut v, "directory", directory);
                v
            }
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

fn insert_non_empty(target: &mut Value, key: &str, value: &Option<String>) {
    if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
        target[key] = Value::String(v.to_string());
    }
}
