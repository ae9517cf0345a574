//! LanceDB-backed passage index.
//!
//! Implements `PassageIndex` from `docent-core` using LanceDB for vector
//! storage and cosine similarity search over the embedded handbook
//! corpus. All passages live in a single `handbook_passages` table with
//! 384-dimensional all-MiniLM-L6-v2 embeddings.

use std::sync::Arc;

use arrow_array::{
    Array, FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator,
    StringArray,
};
use arrow_schema::{DataType, Field};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use uuid::Uuid;

use docent_core::index::{IndexHit, PassageIndex};
use docent_types::corpus::Passage;
use docent_types::error::IndexError;

use super::lance::LanceStore;
use super::schema::{passage_schema, EMBEDDING_DIMENSION};

/// LanceDB-backed passage index over the handbook corpus.
pub struct LancePassageIndex {
    store: LanceStore,
}

impl LancePassageIndex {
    /// Create a passage index backed by the given LanceDB store.
    pub fn new(store: LanceStore) -> Self {
        Self { store }
    }

    /// Ensure the passages table exists, creating it if needed.
    async fn ensure_table(&self) -> Result<lancedb::Table, IndexError> {
        let schema = Arc::new(passage_schema());
        self.store
            .ensure_table(LanceStore::passages_table_name(), schema)
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to ensure passages table: {e}")))
    }

    /// Build an Arrow RecordBatch from passages and their embeddings.
    fn build_record_batch(
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> Result<RecordBatch, IndexError> {
        let schema = Arc::new(passage_schema());

        let id_array = StringArray::from(
            passages.iter().map(|p| p.id.to_string()).collect::<Vec<_>>(),
        );
        let source_array = StringArray::from(
            passages.iter().map(|p| p.source.clone()).collect::<Vec<_>>(),
        );
        let section_array = StringArray::from(
            passages.iter().map(|p| p.section.clone()).collect::<Vec<_>>(),
        );
        let chunk_index_array = Int32Array::from(
            passages
                .iter()
                .map(|p| p.chunk_index as i32)
                .collect::<Vec<_>>(),
        );
        let text_array = StringArray::from(
            passages.iter().map(|p| p.text.clone()).collect::<Vec<_>>(),
        );

        // Build the FixedSizeList vector column from all rows' values.
        let mut values = Vec::with_capacity(embeddings.len() * EMBEDDING_DIMENSION as usize);
        for embedding in embeddings {
            if embedding.len() != EMBEDDING_DIMENSION as usize {
                return Err(IndexError::DimensionMismatch {
                    expected: EMBEDDING_DIMENSION as usize,
                    actual: embedding.len(),
                });
            }
            values.extend_from_slice(embedding);
        }
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        let vector_array = FixedSizeListArray::new(
            field,
            EMBEDDING_DIMENSION,
            Arc::new(Float32Array::from(values)),
            None,
        );

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(id_array),
                Arc::new(source_array),
                Arc::new(section_array),
                Arc::new(chunk_index_array),
                Arc::new(text_array),
                Arc::new(vector_array),
            ],
        )
        .map_err(|e| IndexError::Storage(format!("Failed to build record batch: {e}")))
    }

    /// Parse Arrow RecordBatch rows back into passages with embeddings.
    fn record_batch_to_rows(batch: &RecordBatch) -> Vec<(Passage, Vec<f32>)> {
        let num_rows = batch.num_rows();
        if num_rows == 0 {
            return vec![];
        }

        let id_col = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("id column should be StringArray");
        let source_col = batch
            .column(1)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("source column should be StringArray");
        let section_col = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("section column should be StringArray");
        let chunk_index_col = batch
            .column(3)
            .as_any()
            .downcast_ref::<Int32Array>()
            .expect("chunk_index column should be Int32Array");
        let text_col = batch
            .column(4)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("text column should be StringArray");
        let vector_col = batch
            .column(5)
            .as_any()
            .downcast_ref::<FixedSizeListArray>()
            .expect("vector column should be FixedSizeListArray");

        let mut rows = Vec::with_capacity(num_rows);
        for i in 0..num_rows {
            let embedding = vector_col
                .value(i)
                .as_any()
                .downcast_ref::<Float32Array>()
                .map(|values| values.values().to_vec())
                .unwrap_or_default();

            rows.push((
                Passage {
                    id: Uuid::parse_str(id_col.value(i)).unwrap_or_else(|_| Uuid::nil()),
                    source: source_col.value(i).to_string(),
                    section: section_col.value(i).to_string(),
                    chunk_index: chunk_index_col.value(i) as u32,
                    text: text_col.value(i).to_string(),
                },
                embedding,
            ));
        }

        rows
    }
}

impl PassageIndex for LancePassageIndex {
    async fn add_batch(
        &self,
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> Result<(), IndexError> {
        if passages.len() != embeddings.len() {
            return Err(IndexError::Storage(format!(
                "passage/embedding count mismatch: {} vs {}",
                passages.len(),
                embeddings.len()
            )));
        }
        if passages.is_empty() {
            return Ok(());
        }

        let table = self.ensure_table().await?;
        let batch = Self::build_record_batch(passages, embeddings)?;
        let schema = batch.schema();

        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to add passages: {e}")))?;

        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        fetch_k: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let table = self.ensure_table().await?;

        let results = table
            .vector_search(query_embedding)
            .map_err(|e| IndexError::Storage(format!("Vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(fetch_k)
            .execute()
            .await
            .map_err(|e| IndexError::Storage(format!("Vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to collect results: {e}")))?;

        let mut hits: Vec<IndexHit> = Vec::new();
        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }

            // The _distance column is added by LanceDB vector search.
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            let rows = Self::record_batch_to_rows(batch);
            for (i, (passage, embedding)) in rows.into_iter().enumerate() {
                let distance = distance_col.map_or(0.0, |d| d.value(i));
                hits.push(IndexHit {
                    passage,
                    similarity: 1.0 - distance,
                    embedding,
                });
            }
        }

        // LanceDB returns results ordered by distance; keep that order
        // explicit after merging batches.
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(fetch_k);

        Ok(hits)
    }

    async fn count(&self) -> Result<u64, IndexError> {
        if !self
            .store
            .table_exists(LanceStore::passages_table_name())
            .await
        {
            return Ok(0);
        }

        let table = self.ensure_table().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to count rows: {e}")))?;

        Ok(count as u64)
    }

    async fn reset(&self) -> Result<(), IndexError> {
        self.store
            .drop_table(LanceStore::passages_table_name())
            .await
            .map_err(|e| IndexError::Storage(format!("Failed to drop passages table: {e}")))
    }
}
