//! Corpus document and passage types for Docent.
//!
//! A corpus is a directory of handbook text files. Each file becomes a
//! `CorpusDocument`, which is split into overlapping `Passage` chunks
//! for embedding and retrieval.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single source file from the handbook corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// File name relative to the corpus directory (e.g., "handbook.md").
    pub source: String,
    /// Full text content of the file.
    pub content: String,
    /// Whether the file is markdown (affects chunking and section tracking).
    pub is_markdown: bool,
}

/// A chunk of corpus text prepared for embedding.
///
/// Passages carry enough metadata to cite their origin in answers:
/// the source file and the nearest preceding markdown heading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub id: Uuid,
    /// Source file name (e.g., "handbook.md").
    pub source: String,
    /// Nearest preceding markdown heading, empty for plain text files.
    pub section: String,
    /// Position of this chunk within its source document.
    pub chunk_index: u32,
    /// The chunk text itself.
    pub text: String,
}

impl Passage {
    /// Human-readable citation label: `source -> section` (or just the
    /// source when no section heading applies).
    pub fn citation(&self) -> String {
        if self.section.is_empty() {
            self.source.clone()
        } else {
            format!("{} -> {}", self.source, self.section)
        }
    }
}

/// A passage paired with its retrieval score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Cosine similarity to the query (1.0 = identical direction).
    pub similarity: f32,
}

/// A lightweight reference to a retrieved source, for UI display.
///
/// The snippet is truncated so a sources panel stays readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    pub source: String,
    pub section: String,
    pub snippet: String,
    pub similarity: f32,
}

/// Maximum snippet length shown in sources panels.
pub const SOURCE_SNIPPET_MAX_CHARS: usize = 700;

impl SourceRef {
    /// Build a display reference from a scored passage, truncating the
    /// snippet to [`SOURCE_SNIPPET_MAX_CHARS`].
    pub fn from_scored(scored: &ScoredPassage) -> Self {
        let text = scored.passage.text.trim();
        let snippet = if text.chars().count() > SOURCE_SNIPPET_MAX_CHARS {
            let truncated: String = text.chars().take(SOURCE_SNIPPET_MAX_CHARS).collect();
            format!("{truncated}...")
        } else {
            text.to_string()
        };

        Self {
            source: scored.passage.source.clone(),
            section: scored.passage.section.clone(),
            snippet,
            similarity: scored.similarity,
        }
    }
}
