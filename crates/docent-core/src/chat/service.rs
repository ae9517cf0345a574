//! AssistantService -- the conversational retrieval chain.
//!
//! One turn runs: condense the follow-up question against history ->
//! retrieve passages with MMR -> build the grounded request -> stream the
//! answer. After the surface has collected the full answer it calls
//! `record_exchange`, which persists the turn into session memory and
//! folds overflow into the running summary.

use std::pin::Pin;

use futures_util::Stream;
use tracing::{error, info, warn};
use uuid::Uuid;

use docent_types::chat::ChatMessage;
use docent_types::config::DocentConfig;
use docent_types::corpus::SourceRef;
use docent_types::error::ChatError;
use docent_types::llm::{LlmError, StreamEvent};

use crate::llm::BoxLlmProvider;
use crate::memory::HistorySummarizer;
use crate::retrieval::Retriever;

use super::condense::QuestionCondenser;
use super::prompt;
use super::session::SessionStore;

/// One in-flight answer turn: the retrieved sources plus the event stream.
pub struct AnswerTurn {
    pub session_id: Uuid,
    /// The question as the user typed it.
    pub question: String,
    /// The condensed standalone question used for retrieval.
    pub standalone_question: String,
    /// Display references for the retrieved passages.
    pub sources: Vec<SourceRef>,
    pub stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>,
}

impl std::fmt::Debug for AnswerTurn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerTurn")
            .field("session_id", &self.session_id)
            .field("question", &self.question)
            .field("standalone_question", &self.standalone_question)
            .field("sources", &self.sources)
            .field("stream", &"<stream>")
            .finish()
    }
}

/// Orchestrates retrieval-augmented answer turns over in-memory sessions.
pub struct AssistantService {
    provider: BoxLlmProvider,
    retriever: Retriever,
    sessions: SessionStore,
    config: DocentConfig,
}

impl AssistantService {
    /// Wire the service from its collaborators.
    pub fn new(
        provider: BoxLlmProvider,
        retriever: Retriever,
        config: DocentConfig,
    ) -> Self {
        let sessions = SessionStore::new(config.memory.max_token_limit);
        Self {
            provider,
            retriever,
            sessions,
            config,
        }
    }

    /// Access the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Access the retriever (for status reporting).
    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.config.provider.model
    }

    /// Start an answer turn for a session.
    ///
    /// Fails fast on an unknown session or a retrieval error; LLM errors
    /// surface through the returned stream.
    #[tracing::instrument(name = "answer_turn", skip(self, question), fields(session_id = %session_id))]
    pub async fn answer(&self, session_id: Uuid, question: &str) -> Result<AnswerTurn, ChatError> {
        let (summary, history) = self
            .sessions
            .history_context(&session_id)
            .ok_or(ChatError::SessionNotFound)?;

        // Condense failures are recoverable: retrieval on the raw question
        // is worse than on a rephrased one, but still useful.
        let standalone_question = match QuestionCondenser::condense(
            &self.provider,
            summary.as_deref(),
            &history,
            question,
            &self.config.provider.model,
        )
        .await
        {
            Ok(q) => q,
            Err(e) => {
                warn!(error = %e, "Question condensing failed, using raw question");
                question.to_string()
            }
        };

        let passages = self.retriever.retrieve(&standalone_question).await?;
        let sources: Vec<SourceRef> = passages.iter().map(SourceRef::from_scored).collect();

        let request = prompt::build_answer_request(
            &self.config.assistant,
            &self.config.provider,
            summary.as_deref(),
            &history,
            &passages,
            question,
        );

        info!(
            passages = passages.len(),
            history_len = history.len(),
            "Streaming answer"
        );

        Ok(AnswerTurn {
            session_id,
            question: question.to_string(),
            standalone_question,
            sources,
            stream: self.provider.stream(request),
        })
    }

    /// Record a completed exchange and maintain session memory.
    ///
    /// Appends both messages to the transcript, then folds any overflowing
    /// buffer messages into the running summary. Summarization failures
    /// are non-fatal: the messages are restored and retried on a later
    /// turn.
    pub async fn record_exchange(
        &self,
        session_id: Uuid,
        user_message: ChatMessage,
        assistant_message: ChatMessage,
    ) -> Result<(), ChatError> {
        let work = self
            .sessions
            .record_exchange(&session_id, user_message, assistant_message)
            .ok_or(ChatError::SessionNotFound)?;

        let Some(work) = work else {
            return Ok(());
        };

        match HistorySummarizer::fold(
            &self.provider,
            &work.previous_summary,
            &work.drained,
            &self.config.provider.model,
        )
        .await
        {
            Ok(summary) => {
                self.sessions.apply_summary(&session_id, summary);
            }
            Err(e) => {
                warn!(error = %e, "History summarization failed, keeping messages buffered");
                self.sessions.restore_overflow(&session_id, work.drained);
            }
        }

        Ok(())
    }

    /// Log an answer-path failure and return its user-facing message.
    ///
    /// The full error goes to the log; the user sees one generic line.
    pub fn report_failure(error: &ChatError) -> &'static str {
        error!(error = %error, "Answer generation failed");
        error.user_message()
    }
}
