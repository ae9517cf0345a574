//! LLM provider implementations for Docent.
//!
//! A single OpenAI-compatible client covers both supported backends:
//! Google Gemini (via its OpenAI-compatible endpoint) and OpenAI itself.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
