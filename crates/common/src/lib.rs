//! Shared types for the diagnostic capture agent.

pub mod config;
pub mod error;

pub use config::AgentConfig;
pub use error::{AgentError, AgentResult};
