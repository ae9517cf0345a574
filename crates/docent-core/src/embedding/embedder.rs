//! Embedder trait for text-to-vector conversion.
//!
//! Defines the interface for embedding passages and queries into vectors
//! for similarity search. The implementation (fastembed) lives in
//! docent-infra.

use docent_types::error::IndexError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns one vector per input text. Batch embedding is supported
    /// for efficiency when indexing the whole corpus.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send;

    /// The model name used for embeddings (e.g., "all-MiniLM-L6-v2").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}
