//! Shared domain types for Docent.
//!
//! This crate contains the core domain types used across the Docent
//! handbook assistant: corpus documents and passages, chat sessions and
//! messages, LLM request/response shapes, and configuration.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod corpus;
pub mod error;
pub mod llm;
