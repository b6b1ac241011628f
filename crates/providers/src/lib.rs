//! Reasoning service implementations for reactloop.
//!
//! All providers implement the `reactloop_core::Provider` trait.
//! [`build_from_config`] picks one based on configuration.

pub mod openai_compat;

use std::sync::Arc;

use reactloop_config::{AppConfig, ConfigError};
use reactloop_core::Provider;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// Fails with [`ConfigError::MissingApiKey`] for hosted providers without a
/// key, so credential problems surface before any iteration runs.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ConfigError> {
    let provider = match config.default_provider.as_str() {
        "ollama" => OpenAiCompatProvider::ollama(config.api_url.as_deref()),
        "openrouter" => {
            let key = config.require_api_key()?;
            with_url(OpenAiCompatProvider::openrouter(key), config, "openrouter", key)
        }
        "openai" => {
            let key = config.require_api_key()?;
            with_url(OpenAiCompatProvider::openai(key), config, "openai", key)
        }
        other => {
            let key = config.require_api_key()?;
            let url = config.api_url.as_deref().ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "provider '{other}' needs api_url to be set"
                ))
            })?;
            OpenAiCompatProvider::new(other, url, key)
        }
    };

    tracing::debug!(provider = provider.name(), "Reasoning provider configured");
    Ok(Arc::new(provider))
}

fn with_url(
    default: OpenAiCompatProvider,
    config: &AppConfig,
    name: &str,
    key: &str,
) -> OpenAiCompatProvider {
    match config.api_url.as_deref() {
        Some(url) => OpenAiCompatProvider::new(name, url, key),
        None => default,
    }
}
