//! Action dispatch — turns every outcome of a tool call into an observation.
//!
//! Nothing a tool does escapes this module as an error: unknown names,
//! tool errors, timeouts and panics all come back as an [`Observation`]
//! with `is_error` set, so one bad call never ends the loop.

use futures::FutureExt;
use reactloop_core::action::{Action, ActionLog, Observation};
use reactloop_core::error::ToolError;
use reactloop_core::tool::ToolRegistry;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ActionDispatcher {
    tools: Arc<ToolRegistry>,
    tool_timeout: Duration,
}

impl ActionDispatcher {
    pub fn new(tools: Arc<ToolRegistry>, tool_timeout: Duration) -> Self {
        Self {
            tools,
            tool_timeout,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Invoke `action` and record the outcome in `log`.
    ///
    /// Unknown tools are answered with the list of registered names and are
    /// not logged. Everything else is logged, successful or not.
    pub async fn dispatch(&self, action: &Action, log: &mut ActionLog) -> Observation {
        let Some(tool) = self.tools.get(&action.tool_name) else {
            warn!(tool = %action.tool_name, "Unknown action requested");
            return Observation::error(format!(
                "Unknown action: {}. Available actions: {}",
                action.tool_name,
                self.tools.names().join(", ")
            ));
        };

        let start = std::time::Instant::now();
        let outcome = tokio::time::timeout(
            self.tool_timeout,
            AssertUnwindSafe(tool.invoke(&action.input)).catch_unwind(),
        )
        .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => Err(ToolError::Panicked(panic_message(payload.as_ref()))),
            Err(_) => Err(ToolError::Timeout(self.tool_timeout.as_secs())),
        };

        let duration_ms = start.elapsed().as_millis() as u64;

        let observation = match result {
            Ok(output) => {
                debug!(tool = %action.tool_name, duration_ms, "Tool executed");
                Observation::success(output)
            }
            Err(e) => {
                warn!(tool = %action.tool_name, duration_ms, error = %e, "Tool execution failed");
                Observation::error(format!("Error executing {}: {}", action.tool_name, e))
            }
        };

        log.push(action.clone(), observation.clone());
        observation
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
