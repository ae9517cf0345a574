//! Infrastructure layer for Docent.
//!
//! Contains implementations of the port traits defined in `docent-core`:
//! corpus loading and chunking, fastembed local embeddings, the LanceDB
//! passage index, and the OpenAI-compatible LLM client (Gemini, OpenAI).

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod llm;
pub mod vector;
