//! MMR retriever over the passage index.
//!
//! Embeds the (standalone) question, fetches `fetch_k` nearest candidates
//! from the index, and selects `top_k` of them with maximal marginal
//! relevance.

use tracing::debug;

use docent_types::config::RetrievalConfig;
use docent_types::corpus::ScoredPassage;
use docent_types::error::IndexError;

use crate::embedding::BoxEmbedder;
use crate::index::BoxPassageIndex;

use super::mmr::maximal_marginal_relevance;

/// Retrieves the passages most relevant to a question.
pub struct Retriever {
    embedder: BoxEmbedder,
    index: BoxPassageIndex,
    config: RetrievalConfig,
}

impl Retriever {
    /// Create a retriever over the given embedder and index.
    pub fn new(embedder: BoxEmbedder, index: BoxPassageIndex, config: RetrievalConfig) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Access the embedder (shared with the indexing path).
    pub fn embedder(&self) -> &BoxEmbedder {
        &self.embedder
    }

    /// Access the passage index.
    pub fn index(&self) -> &BoxPassageIndex {
        &self.index
    }

    /// Retrieve the top passages for a question.
    ///
    /// Returns at most `top_k` passages in MMR selection order. An empty
    /// index yields `IndexError::EmptyIndex` rather than an empty result,
    /// so surfaces can distinguish "nothing indexed" from "no match".
    #[tracing::instrument(name = "retrieve_passages", skip(self, question), fields(question_chars = question.len()))]
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredPassage>, IndexError> {
        if self.index.count().await? == 0 {
            return Err(IndexError::EmptyIndex);
        }

        let query_embedding = self.embedder.embed_one(question).await?;
        let candidates = self
            .index
            .search(&query_embedding, self.config.fetch_k)
            .await?;

        let selected = maximal_marginal_relevance(
            &candidates,
            self.config.top_k,
            self.config.mmr_lambda,
        );

        debug!(
            candidates = candidates.len(),
            selected = selected.len(),
            "Passage retrieval complete"
        );

        Ok(selected
            .into_iter()
            .map(|i| ScoredPassage {
                passage: candidates[i].passage.clone(),
                similarity: candidates[i].similarity,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::PassageIndex;
    use crate::testing::{make_passage, stub_embedding, StubEmbedder, VecPassageIndex};

    async fn retriever_with_corpus(texts: &[&str]) -> Retriever {
        let index = VecPassageIndex::new();
        let passages: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| make_passage("handbook.md", "Section", text, i as u32))
            .collect();
        let embeddings: Vec<Vec<f32>> = texts.iter().map(|t| stub_embedding(t)).collect();
        index.add_batch(&passages, &embeddings).await.unwrap();

        Retriever::new(
            BoxEmbedder::new(StubEmbedder),
            crate::index::BoxPassageIndex::new(index),
            RetrievalConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_retrieve_empty_index_errors() {
        let retriever = Retriever::new(
            BoxEmbedder::new(StubEmbedder),
            crate::index::BoxPassageIndex::new(VecPassageIndex::new()),
            RetrievalConfig::default(),
        );

        let err = retriever.retrieve("anything").await.unwrap_err();
        assert!(matches!(err, IndexError::EmptyIndex));
    }

    #[tokio::test]
    async fn test_retrieve_exact_text_ranks_first() {
        let retriever = retriever_with_corpus(&[
            "Vacation policy: unlimited with manager approval.",
            "Expense reports are filed monthly.",
            "All-hands meetings happen quarterly.",
        ])
        .await;

        let results = retriever
            .retrieve("Vacation policy: unlimited with manager approval.")
            .await
            .unwrap();

        assert!(!results.is_empty());
        assert!(results[0].passage.text.contains("Vacation policy"));
        assert!(results[0].similarity > 0.99);
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_top_k() {
        let texts: Vec<String> = (0..30).map(|i| format!("Handbook passage number {i}")).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let retriever = retriever_with_corpus(&refs).await;

        let results = retriever.retrieve("Handbook passage").await.unwrap();
        assert_eq!(results.len(), RetrievalConfig::default().top_k);
    }

    #[tokio::test]
    async fn test_retrieve_small_corpus_returns_what_exists() {
        let retriever = retriever_with_corpus(&["only passage"]).await;
        let results = retriever.retrieve("a question").await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
