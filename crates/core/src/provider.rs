//! CompletionProvider trait — the abstraction over the external LLM API.
//!
//! A provider knows how to send a fixed two-message exchange (system prompt
//! plus user message) to a completion endpoint and return the reply text.
//! The orchestrator calls `complete()` without knowing which backend is
//! configured — the HTTP client lives in its own crate, and tests inject
//! stub implementations.

use crate::error::LlmError;
use async_trait::async_trait;

/// The core CompletionProvider trait.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// A human-readable name for this provider (e.g., "deepseek").
    fn name(&self) -> &str;

    /// Send a system prompt and user message, return the reply text.
    ///
    /// Network faults and non-2xx responses are returned as [`LlmError`],
    /// never panicked.
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> std::result::Result<String, LlmError>;
}
