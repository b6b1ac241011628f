//! Configuration loading, validation, and management for reactloop.
//!
//! Loads configuration from `~/.reactloop/config.toml` with environment
//! variable overrides. Validates all settings at startup, before any
//! reasoning iteration runs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.reactloop/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the reasoning service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider name ("openai", "openrouter", "ollama")
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Override for the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model used by the reasoning loop
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Sampling temperature for the reasoning loop
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Max tokens per reasoning response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Loop controller settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// `summarize_text` tool settings
    #[serde(default)]
    pub summarize: SummarizeConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_tokens() -> u32 {
    800
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("summarize", &self.summarize)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum reasoning calls per session
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Per-call timeout for the reasoning service
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Per-call timeout for a tool invocation
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Case-insensitive substrings that mark a response as final
    #[serde(default = "default_terminal_keywords")]
    pub terminal_keywords: Vec<String>,
}

fn default_max_iterations() -> usize {
    5
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_tool_timeout_secs() -> u64 {
    30
}
fn default_terminal_keywords() -> Vec<String> {
    vec!["final answer".into(), "conclusion".into()]
}

impl AgentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            request_timeout_secs: default_request_timeout_secs(),
            tool_timeout_secs: default_tool_timeout_secs(),
            terminal_keywords: default_terminal_keywords(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeConfig {
    /// Model used by the `summarize_text` tool; falls back to `default_model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Input longer than this many characters is truncated before sending
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,

    /// Max tokens for the summary
    #[serde(default = "default_summary_max_tokens")]
    pub max_tokens: u32,

    /// Timeout for one summary request, in seconds
    #[serde(default = "default_summarize_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_input_chars() -> usize {
    1000
}
fn default_summary_max_tokens() -> u32 {
    150
}
fn default_summarize_timeout_secs() -> u64 {
    20
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_input_chars: default_max_input_chars(),
            max_tokens: default_summary_max_tokens(),
            timeout_secs: default_summarize_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.reactloop/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `REACTLOOP_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("REACTLOOP_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("REACTLOOP_PROVIDER") {
            self.default_provider = provider;
        }

        if let Ok(model) = std::env::var("REACTLOOP_MODEL") {
            self.default_model = model;
        }

        if let Ok(url) = std::env::var("REACTLOOP_API_URL") {
            self.api_url = Some(url);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".reactloop")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.request_timeout_secs == 0 || self.agent.tool_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "agent timeouts must be greater than 0".into(),
            ));
        }

        if self.agent.terminal_keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "agent.terminal_keywords must contain at least one non-empty keyword".into(),
            ));
        }

        if self.summarize.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "summarize.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.summarize.max_input_chars == 0 {
            return Err(ConfigError::ValidationError(
                "summarize.max_input_chars must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Model for `summarize_text`: the explicit setting, else the loop's model.
    pub fn summarize_model(&self) -> &str {
        self.summarize.model.as_deref().unwrap_or(&self.default_model)
    }

    /// Time `summarize_text` waits for the service. Kept under the tool
    /// timeout so the tool's own failure text reaches the model.
    pub fn summarize_timeout(&self) -> Duration {
        let tool_budget = self
            .agent
            .tool_timeout()
            .saturating_sub(Duration::from_secs(1))
            .max(Duration::from_millis(500));
        Duration::from_secs(self.summarize.timeout_secs)
            .min(self.agent.request_timeout())
            .min(tool_budget)
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The API key, or a `MissingApiKey` error for providers that need one.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            api_url: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            summarize: SummarizeConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error(
        "No API key configured. Set REACTLOOP_API_KEY or OPENAI_API_KEY, or add api_key to config.toml"
    )]
    MissingApiKey,
}
