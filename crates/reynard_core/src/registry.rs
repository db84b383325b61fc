use crate::tools::{ToolDescriptor, ToolHandler};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Whether `register` added a new name or shadowed an existing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Inserted,
    Replaced,
}

// ============================================================================
// ToolRegistry
// ============================================================================

/// Name → tool directory. Listing is ordered by name.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Registration {
        let name = handler.name().to_string();
        match self.handlers.insert(name.clone(), handler) {
            Some(_) => {
                tracing::warn!("Tool '{}' re-registered, previous handler replaced", name);
                Registration::Replaced
            }
            None => {
                tracing::debug!("Registered tool: {}", name);
                Registration::Inserted
            }
        }
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.remove(name)
    }

    /// Find a tool by name. `None` is the not-found path, not an error.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Descriptors of every registered tool, sorted by name. Each call
    /// starts a fresh iteration.
    pub fn list(&self) -> impl Iterator<Item = ToolDescriptor> + '_ {
        self.handlers.values().map(|h| h.descriptor())
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
