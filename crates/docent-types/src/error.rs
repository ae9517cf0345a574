use thiserror::Error;

/// Errors from loading and chunking the handbook corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus directory not found: {0}")]
    DirNotFound(String),

    #[error("corpus directory contains no text documents: {0}")]
    Empty(String),

    #[error("failed to read '{path}': {message}")]
    Read { path: String, message: String },

    #[error("invalid chunking configuration: {0}")]
    InvalidChunking(String),
}

/// Errors from the vector index and embedding operations.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("index storage error: {0}")]
    Storage(String),

    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index is empty; run `docent reindex` after adding corpus documents")]
    EmptyIndex,
}

/// Errors from the conversational retrieval chain.
///
/// Surfaces distinguish only "session missing" from "answer failed": the
/// latter is shown as a single generic message while the wrapped cause is
/// logged in full.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session not found")]
    SessionNotFound,

    #[error("retrieval failed: {0}")]
    Retrieval(#[from] IndexError),

    #[error("language model call failed: {0}")]
    Llm(#[from] crate::llm::LlmError),
}

impl ChatError {
    /// The user-facing message for answer-path failures.
    ///
    /// Everything except a missing session collapses to one generic line;
    /// the underlying error goes to the logs instead of the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChatError::SessionNotFound => "Session not found.",
            _ => "Something went wrong while generating the answer.",
        }
    }
}
