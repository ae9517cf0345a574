//! LLM provider abstractions for Docent.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: object-safe wrapper for dynamic dispatch

pub mod box_provider;
pub mod provider;

pub use box_provider::BoxLlmProvider;
pub use provider::LlmProvider;
