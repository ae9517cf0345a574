//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `docent-core` using fastembed's
//! AllMiniLML6V2 model (384 dimensions) with ONNX runtime inference --
//! the `all-MiniLM-L6-v2` sentence transformer. Model files are cached
//! under the data directory so repeated startups skip the download.

use std::path::Path;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use docent_core::embedding::Embedder;
use docent_types::error::IndexError;

use crate::vector::schema::EMBEDDING_DIMENSION;

/// Canonical name of the embedding model, recorded in the index
/// fingerprint.
pub const EMBEDDING_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Local embedder backed by fastembed's AllMiniLML6V2.
pub struct FastembedEmbedder {
    model: Mutex<TextEmbedding>,
}

impl FastembedEmbedder {
    /// Initialize the embedding model, caching model files under
    /// `cache_dir`.
    ///
    /// The first call downloads the ONNX model (~90 MB); later calls load
    /// from the cache.
    pub fn new(cache_dir: &Path) -> Result<Self, IndexError> {
        let options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);

        let model = TextEmbedding::try_new(options)
            .map_err(|e| IndexError::Embedding(format!("failed to initialize {EMBEDDING_MODEL_NAME}: {e}")))?;

        tracing::info!(
            model = EMBEDDING_MODEL_NAME,
            dimension = EMBEDDING_DIMENSION,
            "Embedding model ready"
        );

        Ok(Self {
            model: Mutex::new(model),
        })
    }

    fn ensure_dimension(embedding: &[f32]) -> Result<(), IndexError> {
        if embedding.len() != EMBEDDING_DIMENSION as usize {
            return Err(IndexError::DimensionMismatch {
                expected: EMBEDDING_DIMENSION as usize,
                actual: embedding.len(),
            });
        }
        Ok(())
    }
}

impl Embedder for FastembedEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = {
            let mut model = self
                .model
                .lock()
                .map_err(|e| IndexError::Embedding(format!("embedding model lock poisoned: {e}")))?;
            model
                .embed(texts.to_vec(), None)
                .map_err(|e| IndexError::Embedding(e.to_string()))?
        };

        for embedding in &embeddings {
            Self::ensure_dimension(embedding)?;
        }

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        EMBEDDING_MODEL_NAME
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION as usize
    }
}
