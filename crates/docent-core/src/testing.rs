//! Test doubles shared across docent-core test modules.
//!
//! `StubProvider` replays scripted responses, `StubEmbedder` produces
//! deterministic unit vectors, and `VecPassageIndex` is a brute-force
//! in-memory index. None of them touch the network or the ONNX runtime.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futures_util::Stream;

use docent_types::corpus::Passage;
use docent_types::error::IndexError;
use docent_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities, StopReason, StreamEvent,
    TokenCount, Usage,
};

use crate::embedding::Embedder;
use crate::index::{IndexHit, PassageIndex};
use crate::llm::LlmProvider;

/// Embedding dimension used by all core test doubles.
pub(crate) const STUB_DIMENSION: usize = 8;

/// Scripted LLM provider: each call pops the next canned response.
///
/// Records every request so tests can assert on prompt construction.
/// Clones share the same response queue and request log, so tests can
/// keep a handle after boxing the provider.
#[derive(Clone)]
pub(crate) struct StubProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    capabilities: ProviderCapabilities,
    fail_with: Option<fn() -> LlmError>,
}

impl StubProvider {
    pub(crate) fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Arc::new(Mutex::new(responses.into_iter().map(Into::into).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
            capabilities: ProviderCapabilities {
                streaming: true,
                max_context_tokens: 128_000,
                max_output_tokens: 8_192,
            },
            fail_with: None,
        }
    }

    /// A provider whose every call fails with the given error.
    pub(crate) fn failing(make_error: fn() -> LlmError) -> Self {
        let mut stub = Self::with_responses(Vec::<String>::new());
        stub.fail_with = Some(make_error);
        stub
    }

    /// Requests seen so far, in call order.
    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> String {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default()
    }
}

impl LlmProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(make_error) = self.fail_with {
            return Err(make_error());
        }

        let content = self.next_response();
        Ok(CompletionResponse {
            id: format!("stub-{}", self.requests.lock().unwrap().len()),
            content,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }

    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
        self.requests.lock().unwrap().push(request);
        if let Some(make_error) = self.fail_with {
            return Box::pin(futures_util::stream::once(async move { Err(make_error()) }));
        }

        let content = self.next_response();
        Box::pin(async_stream::stream! {
            yield Ok(StreamEvent::Connected);
            // Emit the response in small chunks to exercise accumulation.
            let chars: Vec<char> = content.chars().collect();
            for chunk in chars.chunks(8) {
                yield Ok(StreamEvent::TextDelta {
                    text: chunk.iter().collect(),
                });
            }
            yield Ok(StreamEvent::Usage(Usage {
                input_tokens: 10,
                output_tokens: 5,
            }));
            yield Ok(StreamEvent::MessageDelta {
                stop_reason: StopReason::EndTurn,
            });
            yield Ok(StreamEvent::Done);
        })
    }

    async fn count_tokens(&self, request: &CompletionRequest) -> Result<TokenCount, LlmError> {
        let chars: usize = request.messages.iter().map(|m| m.content.len() + 10).sum();
        Ok(TokenCount {
            input_tokens: (chars as f64 / 4.0).ceil() as u32,
        })
    }
}

/// Deterministic embedder: hashes text into a unit vector.
///
/// Similar texts do not get similar vectors (it is a hash), but identical
/// texts always embed identically, which is what retrieval tests need.
pub(crate) struct StubEmbedder;

pub(crate) fn stub_embedding(text: &str) -> Vec<f32> {
    let mut vec = vec![0.0_f32; STUB_DIMENSION];
    for (i, byte) in text.bytes().enumerate() {
        vec[i % STUB_DIMENSION] += (byte as f32) * ((i % 7) as f32 + 1.0);
    }
    let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in vec.iter_mut() {
            *val /= norm;
        }
    }
    vec
}

impl Embedder for StubEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, IndexError> {
        Ok(texts.iter().map(|t| stub_embedding(t)).collect())
    }

    fn model_name(&self) -> &str {
        "stub-embedder"
    }

    fn dimension(&self) -> usize {
        STUB_DIMENSION
    }
}

/// Brute-force in-memory passage index for retrieval tests.
pub(crate) struct VecPassageIndex {
    entries: Mutex<Vec<(Passage, Vec<f32>)>>,
}

impl VecPassageIndex {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }
}

impl PassageIndex for VecPassageIndex {
    async fn add_batch(
        &self,
        passages: &[Passage],
        embeddings: &[Vec<f32>],
    ) -> Result<(), IndexError> {
        let mut entries = self.entries.lock().unwrap();
        for (passage, embedding) in passages.iter().zip(embeddings.iter()) {
            entries.push((passage.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        fetch_k: usize,
    ) -> Result<Vec<IndexHit>, IndexError> {
        let entries = self.entries.lock().unwrap();
        let mut hits: Vec<IndexHit> = entries
            .iter()
            .map(|(passage, embedding)| IndexHit {
                passage: passage.clone(),
                similarity: crate::retrieval::mmr::cosine_similarity(query_embedding, embedding),
                embedding: embedding.clone(),
            })
            .collect();
        hits.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(fetch_k);
        Ok(hits)
    }

    async fn count(&self) -> Result<u64, IndexError> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }

    async fn reset(&self) -> Result<(), IndexError> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }
}

/// Build a passage with deterministic metadata for tests.
pub(crate) fn make_passage(source: &str, section: &str, text: &str, chunk_index: u32) -> Passage {
    Passage {
        id: uuid::Uuid::now_v7(),
        source: source.to_string(),
        section: section.to_string(),
        chunk_index,
        text: text.to_string(),
    }
}
