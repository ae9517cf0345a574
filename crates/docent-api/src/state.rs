//! Application state wiring all services together.
//!
//! `AppState` holds the assistant service used by both the CLI chat loop
//! and the HTTP API. Initialization loads the corpus, builds (or reopens)
//! the vector index, and wires the LLM provider from configuration.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;
use serde::Serialize;
use tracing::info;

use docent_core::chat::AssistantService;
use docent_core::embedding::BoxEmbedder;
use docent_core::index::BoxPassageIndex;
use docent_core::llm::BoxLlmProvider;
use docent_core::retrieval::Retriever;
use docent_infra::config::{load_config, resolve_corpus_dir, resolve_data_dir};
use docent_infra::corpus::{chunk_document, corpus_fingerprint, load_corpus};
use docent_infra::embedding::FastembedEmbedder;
use docent_infra::llm::OpenAiCompatProvider;
use docent_infra::vector::{LancePassageIndex, LanceStore};
use docent_types::config::DocentConfig;
use docent_types::corpus::Passage;

/// Passages embedded per batch during indexing.
const EMBED_BATCH_SIZE: usize = 32;

/// Outcome of an index build/check, for status output.
#[derive(Debug, Serialize)]
pub struct IndexReport {
    pub documents: usize,
    pub passages: u64,
    pub rebuilt: bool,
    pub embedding_model: String,
}

/// Shared application state holding the assistant service.
///
/// Used by both the CLI chat loop and the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AssistantService>,
    pub config: DocentConfig,
    pub index_report: Arc<IndexReport>,
}

impl AppState {
    /// Initialize the application state: load config, ensure the vector
    /// index matches the corpus, and wire the LLM provider.
    ///
    /// Fails fast when the corpus is missing/empty or when the configured
    /// API key environment variable is unset.
    pub async fn init(force_reindex: bool, show_progress: bool) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let (embedder, index, report) =
            prepare_index(&data_dir, &config, force_reindex, show_progress).await?;

        // API key check mirrors the fail-fast behavior of the UI: no key,
        // no assistant.
        let api_key = std::env::var(&config.provider.api_key_env)
            .map(SecretString::from)
            .with_context(|| {
                format!(
                    "{} not set. Export your {} API key first.",
                    config.provider.api_key_env, config.provider.kind
                )
            })?;

        let provider = BoxLlmProvider::new(OpenAiCompatProvider::from_config(
            &config.provider,
            api_key,
        ));

        let retriever = Retriever::new(embedder, index, config.retrieval.clone());
        let service = AssistantService::new(provider, retriever, config.clone());

        Ok(Self {
            service: Arc::new(service),
            config,
            index_report: Arc::new(report),
        })
    }
}

/// Load the corpus and ensure the on-disk vector index matches it.
///
/// The index is rebuilt when forced, when empty, or when the stored
/// fingerprint (corpus content + embedding model + chunk settings)
/// differs from the current one.
pub async fn prepare_index(
    data_dir: &Path,
    config: &DocentConfig,
    force: bool,
    show_progress: bool,
) -> anyhow::Result<(BoxEmbedder, BoxPassageIndex, IndexReport)> {
    let corpus_dir = resolve_corpus_dir(config, data_dir);
    let documents = load_corpus(&corpus_dir).await?;

    let mut passages: Vec<Passage> = Vec::new();
    for document in &documents {
        passages.extend(chunk_document(document, &config.chunking)?);
    }

    let embedder = BoxEmbedder::new(FastembedEmbedder::new(&data_dir.join("models"))?);

    let fingerprint = corpus_fingerprint(
        &documents,
        &format!(
            "{}|chunk={}|overlap={}",
            embedder.model_name(),
            config.chunking.chunk_size,
            config.chunking.chunk_overlap
        ),
    );

    let index_dir = data_dir.join("index");
    let store = LanceStore::new(index_dir.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open vector index: {e}"))?;
    let index = BoxPassageIndex::new(LancePassageIndex::new(store));

    let fingerprint_path = index_dir.join("fingerprint");
    let stored_fingerprint = tokio::fs::read_to_string(&fingerprint_path)
        .await
        .unwrap_or_default();

    let stale = force || index.count().await? == 0 || stored_fingerprint.trim() != fingerprint;
    if stale {
        info!(
            documents = documents.len(),
            passages = passages.len(),
            "Building vector index"
        );
        index.reset().await?;

        let progress = if show_progress {
            let bar = indicatif::ProgressBar::new(passages.len() as u64);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("  {msg} [{bar:30.cyan/dim}] {pos}/{len}")
                    .unwrap(),
            );
            bar.set_message("Embedding handbook");
            Some(bar)
        } else {
            None
        };

        for batch in passages.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let embeddings = embedder.embed(&texts).await?;
            index.add_batch(batch, &embeddings).await?;
            if let Some(bar) = &progress {
                bar.inc(batch.len() as u64);
            }
        }
        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        tokio::fs::write(&fingerprint_path, &fingerprint).await?;
    }

    let passage_count = index.count().await?;
    let report = IndexReport {
        documents: documents.len(),
        passages: passage_count,
        rebuilt: stale,
        embedding_model: embedder.model_name().to_string(),
    };

    info!(
        passages = passage_count,
        rebuilt = report.rebuilt,
        "Vector index ready"
    );

    Ok((embedder, index, report))
}

/// Force a full index rebuild (the `docent reindex` command).
pub async fn rebuild_index(show_progress: bool) -> anyhow::Result<IndexReport> {
    let data_dir = resolve_data_dir();
    tokio::fs::create_dir_all(&data_dir).await?;
    let config = load_config(&data_dir).await;
    let (_, _, report) = prepare_index(&data_dir, &config, true, show_progress).await?;
    Ok(report)
}
