//! BoxPassageIndex -- object-safe dynamic dispatch wrapper for PassageIndex.

use std::future::Future;
use std::pin::Pin;

use docent_types::corpus::Passage;
use docent_types::error::IndexError;

use super::passage_index::{IndexHit, PassageIndex};

/// Object-safe version of [`PassageIndex`] with boxed futures.
pub trait PassageIndexDyn: Send + Sync {
    fn add_batch_boxed<'a>(
        &'a self,
        passages: &'a [Passage],
        embeddings: &'a [Vec<f32>],
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>>;

    fn search_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        fetch_k: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexHit>, IndexError>> + Send + 'a>>;

    fn count_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, IndexError>> + Send + 'a>>;

    fn reset_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>>;
}

impl<T: PassageIndex> PassageIndexDyn for T {
    fn add_batch_boxed<'a>(
        &'a self,
        passages: &'a [Passage],
        embeddings: &'a [Vec<f32>],
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
        Box::pin(self.add_batch(passages, embeddings))
    }

    fn search_boxed<'a>(
        &'a self,
        query_embedding: &'a [f32],
        fetch_k: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<IndexHit>, IndexError>> + Send + 'a>> {
        Box::pin(self.search(query_embedding, fetch_k))
    }

    fn count_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<u64, IndexError>> + Send + 'a>> {
        Box::pin(self.count())
    }

    fn reset_boxed<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<(), IndexError>> + Send + 'a>> {
        Box::pin(self.reset())
    }
}

/// Type-erased passage index.
pub struct BoxPassageIndex {
    inner: Box<dyn PassageIndexDyn + Send + Sync>,
}

impl BoxPassageIndex {
    /// Wrap a concrete `PassageIndex` in a type-erased box.
    pub fn new<T: PassageIndex + 'static>(index: T) -> Self {
        Self {
            inner: Box::new(index),
        }
    }

    /// Add a batch of passages with their embedding vectors.
    pub async fn add_batch(
        &self,
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> Result<(), IndexError> {
        self.inner.add_batch_boxed(passages, embeddings).await
    }

    /// Return the `fetch_k` passages nearest to the query embedding.
    pub async fn search(
        &self,
        query_embedding: &[f32],
        fetch_k: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        self.inner.search_boxed(query_embedding, fetch_k).await
    }

    /// Count indexed passages.
    pub async fn count(&self) -> Result<u64, IndexError> {
        self.inner.count_boxed().await
    }

    /// Remove all indexed passages.
    pub async fn reset(&self) -> Result<(), IndexError> {
        self.inner.reset_boxed().await
    }
}
