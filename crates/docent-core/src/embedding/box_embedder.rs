//! BoxEmbedder -- object-safe dynamic dispatch wrapper for Embedder.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`: an object-safe
//! `EmbedderDyn` trait with boxed futures, blanket-implemented for every
//! `Embedder`, wrapped by `BoxEmbedder`.

use std::future::Future;
use std::pin::Pin;

use docent_types::error::IndexError;

use super::embedder::Embedder;

/// Object-safe version of [`Embedder`] with boxed futures.
pub trait EmbedderDyn: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send + 'a>>;

    fn model_name(&self) -> &str;

    fn dimension(&self) -> usize;
}

impl<T: Embedder> EmbedderDyn for T {
    fn embed_boxed<'a>(
        &'a self,
        texts: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vec<f32>>, IndexError>> + Send + 'a>> {
        Box::pin(self.embed(texts))
    }

    fn model_name(&self) -> &str {
        Embedder::model_name(self)
    }

    fn dimension(&self) -> usize {
        Embedder::dimension(self)
    }
}

/// Type-erased embedder for runtime model selection.
pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn + Send + Sync>,
}

impl BoxEmbedder {
    /// Wrap a concrete `Embedder` in a type-erased box.
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }

    /// Embed one or more texts into vectors.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        self.inner.embed_boxed(texts).await
    }

    /// Embed a single text, returning its vector.
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, IndexError> {
        let mut vectors = self.embed(std::slice::from_ref(&text.to_string())).await?;
        vectors
            .pop()
            .ok_or_else(|| IndexError::Embedding("embedder returned no vector".to_string()))
    }

    /// The model name used for embeddings.
    pub fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    /// The dimensionality of the output vectors.
    pub fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}
