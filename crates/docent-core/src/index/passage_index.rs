//! Passage index trait.
//!
//! Defines the interface for vector search over embedded handbook
//! passages. The LanceDB implementation lives in docent-infra.

use docent_types::corpus::Passage;
use docent_types::error::IndexError;

/// A search hit: the passage, its similarity to the query, and its stored
/// embedding.
///
/// The embedding is returned alongside the passage so the retriever can
/// re-rank candidates with maximal marginal relevance without a second
/// round-trip to the index.
#[derive(Debug, Clone)]
pub struct IndexHit {
    pub passage: Passage,
    /// Cosine similarity to the query (1.0 - cosine distance).
    pub similarity: f32,
    pub embedding: Vec<f32>,
}

/// Trait for vector-indexed passage storage with similarity search.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait PassageIndex: Send + Sync {
    /// Add a batch of passages with their embedding vectors.
    ///
    /// `passages` and `embeddings` must be the same length.
    fn add_batch(
        &self,
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;

    /// Return the `fetch_k` passages nearest to the query embedding,
    /// most similar first.
    fn search(
        &self,
        query_embedding: &[f32],
        fetch_k: usize,
    ) -> impl std::future::Future<Output = Result<Vec<IndexHit>, IndexError>> + Send;

    /// Count indexed passages.
    fn count(&self) -> impl std::future::Future<Output = Result<u64, IndexError>> + Send;

    /// Remove all indexed passages.
    fn reset(&self) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;
}
