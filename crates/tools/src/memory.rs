//! Scratchpad tools — `search_memory` and `save_to_memory`.
//!
//! Both wrap a clone of the owning agent's [`MemoryStore`], so whatever one
//! saves the other can find, across every session that agent runs.

use async_trait::async_trait;
use reactloop_core::error::ToolError;
use reactloop_core::tool::Tool;
use reactloop_memory::MemoryStore;

/// Case-insensitive substring search over every key and value.
pub struct SearchMemoryTool {
    store: MemoryStore,
}

impl SearchMemoryTool {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SearchMemoryTool {
    fn name(&self) -> &str {
        "search_memory"
    }

    fn description(&self) -> &str {
        "Search the agent's memory for a keyword. Matches keys and values, case-insensitive."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let query = input.trim();
        let matches = self.store.search(query).await;

        tracing::debug!(query = %query, hits = matches.len(), "Memory search");

        if matches.is_empty() {
            return Ok("No matches found in memory.".into());
        }

        let lines: Vec<String> = matches.iter().map(|m| m.to_string()).collect();
        Ok(format!("Found {} matches:\n{}", matches.len(), lines.join("\n")))
    }
}

/// Stores a `key: value` (or `key = value`) pair, overwriting any previous value.
pub struct SaveToMemoryTool {
    store: MemoryStore,
}

impl SaveToMemoryTool {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for SaveToMemoryTool {
    fn name(&self) -> &str {
        "save_to_memory"
    }

    fn description(&self) -> &str {
        "Save information to memory for later use. Input format: key: value"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let (key, value) = split_entry(input)?;
        self.store.save(key, value).await;
        Ok(format!("Saved '{key}' to memory."))
    }
}

/// Split at whichever of `:` / `=` comes first.
fn split_entry(input: &str) -> Result<(&str, &str), ToolError> {
    let idx = input.find([':', '=']).ok_or_else(|| {
        ToolError::InvalidInput("Expected 'key: value' or 'key = value'".into())
    })?;

    let key = input[..idx].trim();
    let value = input[idx + 1..].trim();

    if key.is_empty() {
        return Err(ToolError::InvalidInput("Memory key must not be empty".into()));
    }

    Ok((key, value))
}
