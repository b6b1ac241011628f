//! # reactloop core
//!
//! Domain types, traits, and error definitions for the reactloop
//! Reason+Act agent. This crate has **zero framework dependencies** — it defines
//! the domain model that every other crate implements against.
//!
//! ## Design Philosophy
//!
//! The two external seams of the loop are traits here:
//! - [`Provider`] — the reasoning service consulted every iteration
//! - [`Tool`] — a named capability the model can invoke
//!
//! Implementations live in their respective crates, so tests can swap in
//! scripted providers and stub tools.

pub mod action;
pub mod error;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use action::{Action, ActionLog, ActionRecord, Observation};
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Role, SessionId, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use tool::{Tool, ToolRegistry};
