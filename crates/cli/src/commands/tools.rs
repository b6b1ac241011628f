//! `reactloop tools` — List the built-in tools in prompt order.

use reactloop_config::AppConfig;
use reactloop_memory::MemoryStore;
use reactloop_providers::OpenAiCompatProvider;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Listing never invokes summarize_text, so any provider will do here.
    let placeholder = Arc::new(OpenAiCompatProvider::ollama(None));
    let registry = reactloop_tools::default_registry(MemoryStore::new(), placeholder, &config)?;

    println!("Built-in tools ({}):\n", registry.len());
    for tool in registry.list() {
        println!("  {:<18} {}", tool.name(), tool.description());
    }

    Ok(())
}
