//! ReAct loop controller — Thought → Action → Observation.
//!
//! The agent asks the reasoning service for its next step, parses any
//! `Action:` / `Action Input:` pair out of the reply, dispatches it, feeds
//! the observation back, and repeats until a termination condition fires.
//!
//! # States
//!
//! ```text
//! Init → AwaitingModel → (Dispatching → AwaitingModel)* → Done
//! ```
//!
//! A session ends when:
//! - the termination detector flags a response (`TerminalMarker`)
//! - a response after the first has no action (`NoActionAfterFirstStep`)
//! - the reasoning-call budget is spent (`MaxIterations`)
//! - the reasoning service fails or times out (`ReasoningServiceError`)
//!
//! Tool failures never end a session; they come back as observations.

use reactloop_config::AppConfig;
use reactloop_core::action::{Action, ActionLog};
use reactloop_core::error::{ProviderError, Result};
use reactloop_core::message::{SessionId, Turn};
use reactloop_core::provider::{Provider, ProviderRequest};
use reactloop_core::tool::ToolRegistry;
use reactloop_memory::MemoryStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::dispatcher::ActionDispatcher;
use crate::parser::{ParsedAction, ParsedResponse, parse_response};
use crate::prompt;
use crate::termination::{KeywordDetector, TerminationDetector};

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatedBy {
    TerminalMarker,
    NoActionAfterFirstStep,
    MaxIterations,
    ReasoningServiceError,
}

impl std::fmt::Display for TerminatedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::TerminalMarker => "terminal marker",
            Self::NoActionAfterFirstStep => "no action after first step",
            Self::MaxIterations => "max iterations",
            Self::ReasoningServiceError => "reasoning service error",
        };
        f.write_str(s)
    }
}

/// One reasoning call, as the model answered it (or how it failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThoughtRecord {
    /// 1-based call number.
    pub iteration: usize,
    pub response: String,
}

/// The result of one `solve` call.
#[derive(Debug, Clone, Serialize)]
pub struct LoopResult {
    pub session_id: SessionId,
    pub problem: String,
    /// Latest assistant text, empty if the model never answered.
    pub final_text: String,
    /// Every turn sent or received, starting with the system prompt.
    pub history: Vec<Turn>,
    pub action_log: ActionLog,
    pub thoughts: Vec<ThoughtRecord>,
    /// Reasoning calls made.
    pub iterations: usize,
    pub terminated_by: TerminatedBy,
    /// Set when the reasoning service failed.
    pub error: Option<String>,
}

impl LoopResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug)]
enum LoopState {
    Init,
    AwaitingModel,
    Dispatching(Action),
    Done(TerminatedBy),
}

/// Mutable state of one session. Owned by a single `solve` call.
struct Session {
    id: SessionId,
    dialogue: Vec<Turn>,
    action_log: ActionLog,
    thoughts: Vec<ThoughtRecord>,
    calls: usize,
    final_text: String,
    error: Option<String>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: SessionId::new(),
            dialogue: Vec::new(),
            action_log: ActionLog::new(),
            thoughts: Vec::new(),
            calls: 0,
            final_text: String::new(),
            error: None,
        }
    }
}

pub struct ReactAgent {
    /// Reasoning service.
    provider: Arc<dyn Provider>,
    /// Model name.
    model: String,
    temperature: f32,
    max_tokens: u32,
    /// Default reasoning-call budget for [`solve`](Self::solve).
    max_iterations: usize,
    request_timeout: Duration,
    dispatcher: ActionDispatcher,
    detector: Box<dyn TerminationDetector>,
    /// Scratchpad shared with the memory tools.
    memory: MemoryStore,
}

impl ReactAgent {
    /// Create an agent over an existing tool registry.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.1,
            max_tokens: 800,
            max_iterations: 5,
            request_timeout: Duration::from_secs(60),
            dispatcher: ActionDispatcher::new(tools, Duration::from_secs(30)),
            detector: Box::new(KeywordDetector::default()),
            memory: MemoryStore::new(),
        }
    }

    /// Build an agent with the built-in tools, wired from configuration.
    ///
    /// The same provider serves the loop and the `summarize_text` tool.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Result<Self> {
        let memory = MemoryStore::new();
        let tools = reactloop_tools::default_registry(memory.clone(), provider.clone(), config)?;

        Ok(Self::new(provider, config.default_model.clone(), Arc::new(tools))
            .with_memory(memory)
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_max_iterations(config.agent.max_iterations)
            .with_request_timeout(config.agent.request_timeout())
            .with_tool_timeout(config.agent.tool_timeout())
            .with_detector(KeywordDetector::new(&config.agent.terminal_keywords)))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    /// Set the default reasoning-call budget.
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    /// Replace the termination detector.
    pub fn with_detector(mut self, detector: impl TerminationDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Use `memory` as this agent's scratchpad.
    ///
    /// Only meaningful when the registry's memory tools share the same store.
    pub fn with_memory(mut self, memory: MemoryStore) -> Self {
        self.memory = memory;
        self
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn tools(&self) -> &ToolRegistry {
        self.dispatcher.tools()
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Solve `problem` with the configured iteration budget.
    pub async fn solve(&self, problem: &str) -> LoopResult {
        self.solve_with_limit(problem, self.max_iterations).await
    }

    /// Solve `problem` making at most `max_iterations` reasoning calls.
    pub async fn solve_with_limit(&self, problem: &str, max_iterations: usize) -> LoopResult {
        let mut session = Session::new();

        if max_iterations == 0 {
            info!(session_id = %session.id, "ReAct loop skipped: zero iteration budget");
            return self.finish(session, problem, Vec::new(), TerminatedBy::MaxIterations);
        }

        info!(
            session_id = %session.id,
            model = %self.model,
            max_iterations,
            "ReAct loop starting"
        );

        let mut state = LoopState::Init;
        let terminated_by = loop {
            state = match state {
                LoopState::Init => LoopState::AwaitingModel,
                LoopState::AwaitingModel => {
                    self.await_model(&mut session, problem, max_iterations).await
                }
                LoopState::Dispatching(action) => {
                    debug!(
                        session_id = %session.id,
                        tool = %action.tool_name,
                        input = %action.input,
                        "Dispatching action"
                    );
                    let observation = self
                        .dispatcher
                        .dispatch(&action, &mut session.action_log)
                        .await;
                    session.dialogue.push(prompt::observation_turn(&observation));
                    LoopState::AwaitingModel
                }
                LoopState::Done(reason) => break reason,
            };
        };

        info!(
            session_id = %session.id,
            iterations = session.calls,
            actions = session.action_log.len(),
            terminated_by = %terminated_by,
            "ReAct loop completed"
        );

        let history = prompt::compose(self.tools(), problem, &session.dialogue);
        self.finish(session, problem, history, terminated_by)
    }

    async fn await_model(&self, session: &mut Session, problem: &str, max: usize) -> LoopState {
        if session.calls >= max {
            warn!(session_id = %session.id, max, "ReAct: max iterations reached");
            return LoopState::Done(TerminatedBy::MaxIterations);
        }

        session.calls += 1;
        let iteration = session.calls;
        debug!(session_id = %session.id, iteration, "ReAct iteration");

        let messages = prompt::compose(self.tools(), problem, &session.dialogue);
        let text = match self.call_model(messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!(session_id = %session.id, iteration, error = %e, "Reasoning service failed");
                session.thoughts.push(ThoughtRecord {
                    iteration,
                    response: format!("Error in iteration {iteration}: {e}"),
                });
                session.error = Some(e.to_string());
                return LoopState::Done(TerminatedBy::ReasoningServiceError);
            }
        };

        session.dialogue.push(Turn::assistant(text.clone()));
        session.thoughts.push(ThoughtRecord {
            iteration,
            response: text.clone(),
        });

        let parsed = parse_response(&text, self.detector.as_ref());
        session.final_text = text;

        next_state(parsed, iteration, max)
    }

    async fn call_model(&self, messages: Vec<Turn>) -> std::result::Result<String, ProviderError> {
        let request = ProviderRequest::new(self.model.clone(), messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        match tokio::time::timeout(self.request_timeout, self.provider.complete(request)).await {
            Ok(response) => response.map(|r| r.content),
            Err(_) => Err(ProviderError::Timeout(self.request_timeout.as_secs())),
        }
    }

    fn finish(
        &self,
        session: Session,
        problem: &str,
        history: Vec<Turn>,
        terminated_by: TerminatedBy,
    ) -> LoopResult {
        LoopResult {
            session_id: session.id,
            problem: problem.to_string(),
            final_text: session.final_text,
            history,
            action_log: session.action_log,
            thoughts: session.thoughts,
            iterations: session.calls,
            terminated_by,
            error: session.error,
        }
    }
}

/// Transition after a successful reasoning call number `calls`.
fn next_state(parsed: ParsedResponse, calls: usize, max: usize) -> LoopState {
    if parsed.terminal_hint {
        return LoopState::Done(TerminatedBy::TerminalMarker);
    }

    match parsed.action {
        ParsedAction::Action(action) if calls < max => LoopState::Dispatching(action),
        ParsedAction::Action(_) => LoopState::Done(TerminatedBy::MaxIterations),
        ParsedAction::Malformed { reason } if calls > 1 => {
            debug!(%reason, "Malformed action treated as no action");
            LoopState::Done(TerminatedBy::NoActionAfterFirstStep)
        }
        ParsedAction::NoAction if calls > 1 => {
            LoopState::Done(TerminatedBy::NoActionAfterFirstStep)
        }
        ParsedAction::Malformed { reason } => {
            debug!(%reason, "Malformed action on first step, asking again");
            LoopState::AwaitingModel
        }
        ParsedAction::NoAction => LoopState::AwaitingModel,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
