//! Shared test helpers: scripted providers and stub tools.

use async_trait::async_trait;
use reactloop_core::error::{ProviderError, ToolError};
use reactloop_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use reactloop_core::tool::Tool;
use std::sync::Mutex;
use std::time::Duration;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    call_count: Mutex<usize>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script plain text replies, one per call.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| make_text_response(t)).collect())
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        self.requests.lock().unwrap().push(request);
        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        content: text.into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Answers with scripted texts, then fails every call after that.
pub struct FailingProvider {
    inner: SequentialMockProvider,
    error: ProviderError,
}

impl FailingProvider {
    pub fn after(texts: &[&str], error: ProviderError) -> Self {
        Self {
            inner: SequentialMockProvider::texts(texts),
            error,
        }
    }
}

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let remaining = self.inner.responses.lock().unwrap().len() - self.inner.call_count();
        if remaining == 0 {
            return Err(self.error.clone());
        }
        self.inner.complete(request).await
    }
}

/// Never answers within any reasonable timeout.
pub struct StallingProvider;

#[async_trait]
impl Provider for StallingProvider {
    fn name(&self) -> &str {
        "stalling_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(make_text_response("too late"))
    }
}

// ── Stub tools ────────────────────────────────────────────────────────────

/// Returns its input unchanged.
pub struct EchoTool {
    name: String,
}

impl EchoTool {
    pub fn named(name: &str) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echo the input back"
    }

    async fn invoke(&self, input: &str) -> Result<String, ToolError> {
        Ok(input.to_string())
    }
}

/// Always fails with the given message.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "broken"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        Err(ToolError::Failed("disk on fire".into()))
    }
}

/// Panics on every call.
pub struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "explode"
    }

    fn description(&self) -> &str {
        "Panics"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        panic!("kaboom");
    }
}

/// Sleeps for an hour before answering.
pub struct SlowTool;

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }

    fn description(&self) -> &str {
        "Takes forever"
    }

    async fn invoke(&self, _input: &str) -> Result<String, ToolError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("finally".into())
    }
}
