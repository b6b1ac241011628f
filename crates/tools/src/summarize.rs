//! `summarize_text` — asks the reasoning service for a short summary.
//!
//! Failures of the service are reported inside the observation text
//! (`"Error summarizing: ..."`) rather than as a tool error, so the model
//! sees them the same way it sees a summary.

use async_trait::async_trait;
use reactloop_config::{AppConfig, SummarizeConfig};
use reactloop_core::error::{ProviderError, ToolError};
use reactloop_core::message::Turn;
use reactloop_core::provider::{Provider, ProviderRequest};
use reactloop_core::tool::Tool;
use std::sync::Arc;
use std::time::Duration;

const INSTRUCTION: &str = "Summarize the following text concisely.";

pub struct SummarizeTool {
    provider: Arc<dyn Provider>,
    model: String,
    settings: SummarizeConfig,
    timeout: Duration,
}

impl SummarizeTool {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        settings: SummarizeConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            settings,
            timeout,
        }
    }

    /// Build from app settings, sharing the loop's model unless one is set.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(
            provider,
            config.summarize_model(),
            config.summarize.clone(),
            config.summarize_timeout(),
        )
    }

    async fn summarize(&self, text: String) -> Result<String, ProviderError> {
        let request = ProviderRequest::new(
            self.model.clone(),
            vec![Turn::system(INSTRUCTION), Turn::user(text)],
        )
        .with_max_tokens(self.settings.max_tokens);

        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(result) => result.map(|r| r.content),
            Err(_) => Err(ProviderError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Keep the first `max_chars` characters, marking the cut with `...`.
fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        "summarize_text"
    }

    fn description(&self) -> &str {
        "Summarize provided text using AI."
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        let text = truncate(input, self.settings.max_input_chars);

        match self.summarize(text).await {
            Ok(summary) => Ok(format!("Summary: {summary}")),
            Err(e) => {
                tracing::warn!(
                    provider = %self.provider.name(),
                    error = %e,
                    "Summarization failed"
                );
                Ok(format!("Error summarizing: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactloop_core::provider::ProviderResponse;
    use std::sync::Mutex;

    /// Records every request and replies with a fixed outcome.
    struct RecordingProvider {
        reply: Result<String, ProviderError>,
        delay: Option<Duration>,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    impl RecordingProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.into()),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self {
                reply: Err(err),
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map(|content| ProviderResponse {
                content,
                usage: None,
                model: "mock".into(),
            })
        }
    }

    fn tool(provider: Arc<RecordingProvider>) -> SummarizeTool {
        SummarizeTool::new(
            provider,
            "summary-model",
            SummarizeConfig::default(),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn returns_summary_and_sends_instruction() {
        let provider = Arc::new(RecordingProvider::replying("Short."));
        let out = tool(provider.clone()).invoke("A long story.").await.unwrap();
        assert_eq!(out, "Summary: Short.");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "summary-model");
        assert_eq!(seen[0].max_tokens, Some(150));
        assert_eq!(seen[0].messages[0].content, INSTRUCTION);
        assert_eq!(seen[0].messages[1].content, "A long story.");
    }

    #[tokio::test]
    async fn long_input_is_truncated() {
        let provider = Arc::new(RecordingProvider::replying("ok"));
        let input = "x".repeat(1500);
        tool(provider.clone()).invoke(&input).await.unwrap();

        let seen = provider.seen.lock().unwrap();
        let sent = &seen[0].messages[1].content;
        assert_eq!(sent.chars().count(), 1003);
        assert!(sent.ends_with("..."));
    }

    #[tokio::test]
    async fn service_failure_is_reported_in_text() {
        let provider = Arc::new(RecordingProvider::failing(ProviderError::Network(
            "connection refused".into(),
        )));
        let out = tool(provider).invoke("text").await.unwrap();
        assert!(out.starts_with("Error summarizing: "));
        assert!(out.contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_service_times_out() {
        let provider = Arc::new(RecordingProvider {
            reply: Ok("late".into()),
            delay: Some(Duration::from_secs(60)),
            seen: Mutex::new(Vec::new()),
        });
        let tool = SummarizeTool::new(
            provider,
            "summary-model",
            SummarizeConfig::default(),
            Duration::from_secs(1),
        );
        let out = tool.invoke("text").await.unwrap();
        assert!(out.starts_with("Error summarizing: "));
        assert!(out.contains("timed out"));
    }

    #[tokio::test]
    async fn from_config_uses_loop_model_for_ollama() {
        let mut config = AppConfig::default();
        config.default_provider = "ollama".into();
        config.default_model = "llama3".into();

        let provider = Arc::new(RecordingProvider::replying("Short."));
        let tool = SummarizeTool::from_config(provider.clone(), &config);
        assert_eq!(tool.timeout, Duration::from_secs(20));

        let out = tool.invoke("A long story.").await.unwrap();
        assert_eq!(out, "Summary: Short.");
        assert_eq!(provider.seen.lock().unwrap()[0].model, "llama3");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }
}
