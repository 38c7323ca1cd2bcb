//! LLM integration for agent perspectives
//!
//! The grid never talks to the network. A selection is turned into an
//! [`AgentView`](context::AgentView), the view into a prompt, and the prompt
//! is handed to a [`TextGenerator`].

pub mod client;
pub mod context;
pub mod prompt;

use crate::core::error::Result;

pub use client::{ApiFormat, LlmClient};
pub use context::AgentView;

/// Narrow interface to an external text-generation service
///
/// One prompt in, one completion out. Implemented over HTTP by
/// [`LlmClient`]; tests substitute stubs.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}
