//! The Reason+Act loop — the heart of reactloop.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Compose** the system prompt (tools + action grammar) and the problem
//! 2. **Ask** the reasoning service for the next step
//! 3. **Parse** an `Action:` / `Action Input:` pair out of the reply
//! 4. **If an action**: dispatch it, append the observation, loop back to 2
//! 5. **If final**: return the [`LoopResult`]
//!
//! The loop stops on a terminal marker, on a later reply with no action,
//! when the reasoning-call budget is spent, or when the service fails.

pub mod dispatcher;
pub mod parser;
pub mod prompt;
pub mod react;
pub mod termination;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use dispatcher::ActionDispatcher;
pub use parser::{ParsedAction, ParsedResponse, parse_response};
pub use react::{LoopResult, ReactAgent, TerminatedBy, ThoughtRecord};
pub use termination::{KeywordDetector, TerminationDetector};
