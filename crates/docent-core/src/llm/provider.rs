//! LlmProvider trait definition.
//!
//! This is the core abstraction the answer chain talks to. Uses RPITIT
//! for `complete` and `count_tokens`, and `Pin<Box<dyn Stream>>` for
//! `stream` (streams need to be object-safe for the BoxLlmProvider
//! wrapper).

use std::pin::Pin;

use futures_util::Stream;

use docent_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StreamEvent, TokenCount,
};

/// Trait for LLM provider backends (Gemini, OpenAI, stubs in tests).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition) for
/// `complete` and `count_tokens`. The `stream` method returns a boxed
/// stream because streams need to be object-safe for `BoxLlmProvider`.
///
/// Implementations live in docent-infra.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// What this provider supports (streaming, context limits).
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;

    /// Count the tokens in a request without sending it to the LLM.
    fn count_tokens(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<TokenCount, LlmError>> + Send;
}
