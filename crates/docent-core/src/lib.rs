//! Business logic and port trait definitions for Docent.
//!
//! This crate defines the "ports" (embedder, passage index, LLM provider)
//! that the infrastructure layer implements, plus the retrieval chain,
//! conversation memory, and in-memory session store. It depends only on
//! `docent-types` -- never on `docent-infra` or any IO crate.

pub mod chat;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod memory;
pub mod retrieval;

#[cfg(test)]
pub(crate) mod testing;
