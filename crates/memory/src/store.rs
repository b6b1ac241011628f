//! In-memory key/value store — the agent's scratchpad.
//!
//! Lives as long as the owning agent, not a single session: an agent reused
//! for several problems still sees what it saved earlier. Nothing is
//! persisted.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A cheaply clonable handle to one agent's scratchpad.
///
/// Clones share the same underlying map, which is how the memory tools and
/// the agent that owns them see the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMatch {
    pub key: String,
    pub value: String,
}

impl std::fmt::Display for MemoryMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value, if any.
    pub async fn save(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let previous = self.entries.write().await.insert(key.clone(), value.into());
        if previous.is_some() {
            tracing::debug!(key = %key, "Overwrote memory entry");
        }
        previous
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    /// Case-insensitive substring match against every key and value.
    ///
    /// Results are sorted by key.
    pub async fn search(&self, query: &str) -> Vec<MemoryMatch> {
        let query_lower = query.to_lowercase();
        let entries = self.entries.read().await;

        let mut matches: Vec<MemoryMatch> = entries
            .iter()
            .filter(|(k, v)| {
                k.to_lowercase().contains(&query_lower) || v.to_lowercase().contains(&query_lower)
            })
            .map(|(k, v)| MemoryMatch {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();

        matches.sort_by(|a, b| a.key.cmp(&b.key));
        matches
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_get() {
        let store = MemoryStore::new();
        assert!(store.save("schedule", "9-5").await.is_none());
        assert_eq!(store.get("schedule").await.as_deref(), Some("9-5"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        store.save("k", "v").await;
        let previous = store.save("k", "w").await;
        assert_eq!(previous.as_deref(), Some("v"));
        assert_eq!(store.get("k").await.as_deref(), Some("w"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn search_matches_keys_and_values_case_insensitively() {
        let store = MemoryStore::new();
        store.save("Budget", "80 dollars").await;
        store.save("guests", "twelve people, BUDGET conscious").await;
        store.save("menu", "meat and vegetables").await;

        let hits = store.search("budget").await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].key, "Budget");
        assert_eq!(hits[1].key, "guests");
        assert_eq!(hits[0].to_string(), "Budget: 80 dollars");
    }

    #[tokio::test]
    async fn search_with_no_hits_is_empty() {
        let store = MemoryStore::new();
        store.save("a", "b").await;
        assert!(store.search("zzz").await.is_empty());
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        handle.save("shared", "yes").await;
        assert_eq!(store.get("shared").await.as_deref(), Some("yes"));
        assert_eq!(handle.len().await, 1);
    }
}
