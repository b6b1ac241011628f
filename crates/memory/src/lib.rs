//! Scratchpad memory for reactloop agents.

pub mod store;

pub use store::{MemoryMatch, MemoryStore};
