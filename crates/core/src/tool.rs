//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what let the agent act: do arithmetic, read and write its
//! scratchpad memory, count words, summarize text.

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::{Error, Result, ToolError};

/// The core Tool trait.
///
/// Each built-in tool implements this trait. Tools are registered in the
/// [`ToolRegistry`] and made available to the agent loop. A tool takes the
/// raw single-line `Action Input` text and returns the observation text.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculator", "word_count").
    fn name(&self) -> &str;

    /// A description of what this tool does (listed in the system prompt).
    fn description(&self) -> &str;

    /// Execute the tool with the given input.
    async fn invoke(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// A registry of available tools.
///
/// Preserves registration order so the tool list in prompts, the
/// "Available actions" hint and tests are reproducible.
pub struct ToolRegistry {
    tools: IndexMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool. Fails if a tool with the same name already exists.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(Error::Config {
                message: format!("Tool '{name}' is already registered"),
            });
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// All tools, in registration order.
    pub fn list(&self) -> impl Iterator<Item = &dyn Tool> {
        self.tools.values().map(|t| t.as_ref())
    }

    /// List all registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
