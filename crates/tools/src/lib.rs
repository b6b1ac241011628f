//! Built-in tool implementations for reactloop.
//!
//! Tools give the agent the ability to act: do arithmetic, read and write
//! its scratchpad memory, tell the time, count words, and summarize text.

pub mod calculator;
pub mod memory;
pub mod summarize;
pub mod time;
pub mod word_count;

use reactloop_config::AppConfig;
use reactloop_core::error::Result;
use reactloop_core::provider::Provider;
use reactloop_core::tool::ToolRegistry;
use reactloop_memory::MemoryStore;
use std::sync::Arc;

/// Create a registry with all built-in tools.
///
/// Registration order is the order the model sees them listed:
/// calculator, search_memory, save_to_memory, get_current_time, word_count,
/// summarize_text. Both memory tools share `memory`; `summarize_text` calls
/// `summarizer` with the loop's model unless `config.summarize.model` is set.
pub fn default_registry(
    memory: MemoryStore,
    summarizer: Arc<dyn Provider>,
    config: &AppConfig,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(calculator::CalculatorTool))?;
    registry.register(Box::new(memory::SearchMemoryTool::new(memory.clone())))?;
    registry.register(Box::new(memory::SaveToMemoryTool::new(memory)))?;
    registry.register(Box::new(time::CurrentTimeTool))?;
    registry.register(Box::new(word_count::WordCountTool))?;
    registry.register(Box::new(summarize::SummarizeTool::from_config(summarizer, config)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reactloop_core::error::ProviderError;
    use reactloop_core::provider::{ProviderRequest, ProviderResponse};

    struct Silent;

    #[async_trait]
    impl Provider for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        async fn complete(
            &self,
            _: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("silent".into()))
        }
    }

    #[test]
    fn default_registry_order() {
        let registry =
            default_registry(MemoryStore::new(), Arc::new(Silent), &AppConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "calculator",
                "search_memory",
                "save_to_memory",
                "get_current_time",
                "word_count",
                "summarize_text",
            ]
        );
    }

    #[tokio::test]
    async fn memory_tools_share_the_store() {
        let store = MemoryStore::new();
        let registry =
            default_registry(store.clone(), Arc::new(Silent), &AppConfig::default()).unwrap();

        registry
            .get("save_to_memory")
            .unwrap()
            .invoke("guests: 12")
            .await
            .unwrap();
        assert_eq!(store.get("guests").await.as_deref(), Some("12"));

        let out = registry.get("search_memory").unwrap().invoke("guests").await.unwrap();
        assert!(out.contains("guests: 12"));
    }
}
