//! Passage retrieval for Docent.
//!
//! The retriever embeds a question, fetches nearest-neighbor candidates
//! from the passage index, and re-ranks them with maximal marginal
//! relevance to balance relevance against diversity.

pub mod mmr;
pub mod retriever;

pub use retriever::Retriever;
