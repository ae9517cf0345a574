//! In-memory session store.
//!
//! All conversation state lives in a `DashMap` for the lifetime of the
//! process: the session record, the transcript, and the summary buffer
//! memory. Nothing is persisted.
//!
//! Summarization happens outside the map lock: `record_exchange` returns
//! any drained overflow messages, the caller folds them with the LLM, then
//! applies the new summary (or restores the messages on failure).

use dashmap::DashMap;
use uuid::Uuid;

use chrono::Utc;

use docent_types::chat::{ChatMessage, ChatSession, SessionStatus};
use docent_types::llm::Message;

use crate::memory::SummaryBufferMemory;

/// State held per session: record, transcript, memory.
#[derive(Debug)]
struct SessionState {
    session: ChatSession,
    transcript: Vec<ChatMessage>,
    memory: SummaryBufferMemory,
}

/// Messages drained from a session's buffer, awaiting summarization.
#[derive(Debug)]
pub struct PruneWork {
    pub previous_summary: String,
    pub drained: Vec<Message>,
}

/// Thread-safe in-memory store for chat sessions.
pub struct SessionStore {
    sessions: DashMap<Uuid, SessionState>,
    memory_token_limit: u32,
}

impl SessionStore {
    /// Create an empty store; sessions get summary buffers with the given
    /// token budget.
    pub fn new(memory_token_limit: u32) -> Self {
        Self {
            sessions: DashMap::new(),
            memory_token_limit,
        }
    }

    /// Create a new active session against the given model.
    pub fn create(&self, model: String) -> ChatSession {
        let session = ChatSession::new(model);
        self.sessions.insert(
            session.id,
            SessionState {
                session: session.clone(),
                transcript: Vec::new(),
                memory: SummaryBufferMemory::new(self.memory_token_limit),
            },
        );
        session
    }

    /// Get a session record by ID.
    pub fn get(&self, session_id: &Uuid) -> Option<ChatSession> {
        self.sessions.get(session_id).map(|s| s.session.clone())
    }

    /// List all session records, most recently started first.
    pub fn list(&self) -> Vec<ChatSession> {
        let mut sessions: Vec<ChatSession> =
            self.sessions.iter().map(|s| s.session.clone()).collect();
        sessions.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        sessions
    }

    /// Get the transcript for a session.
    pub fn messages(&self, session_id: &Uuid) -> Option<Vec<ChatMessage>> {
        self.sessions
            .get(session_id)
            .map(|s| s.transcript.clone())
    }

    /// The conversation context for the next turn: running summary (if
    /// any) and the buffered recent messages.
    pub fn history_context(&self, session_id: &Uuid) -> Option<(Option<String>, Vec<Message>)> {
        self.sessions.get(session_id).map(|s| {
            (
                s.memory.summary().map(str::to_string),
                s.memory.messages().to_vec(),
            )
        })
    }

    /// Record a completed exchange: append both messages to the transcript,
    /// update counters, push the exchange into memory, and drain any
    /// overflow for summarization.
    ///
    /// Returns `None` for an unknown session, `Some(None)` when no
    /// summarization is needed, and `Some(Some(work))` when the caller
    /// should fold `work.drained` into the summary.
    pub fn record_exchange(
        &self,
        session_id: &Uuid,
        user_message: ChatMessage,
        assistant_message: ChatMessage,
    ) -> Option<Option<PruneWork>> {
        let mut state = self.sessions.get_mut(session_id)?;

        state.session.message_count += 2;
        state.session.total_input_tokens += assistant_message.input_tokens.unwrap_or(0);
        state.session.total_output_tokens += assistant_message.output_tokens.unwrap_or(0);

        state
            .memory
            .append_exchange(&user_message.content, &assistant_message.content);
        state.transcript.push(user_message);
        state.transcript.push(assistant_message);

        let drained = state.memory.drain_overflow();
        if drained.is_empty() {
            Some(None)
        } else {
            Some(Some(PruneWork {
                previous_summary: state.memory.summary().unwrap_or_default().to_string(),
                drained,
            }))
        }
    }

    /// Apply a freshly folded summary to a session's memory.
    pub fn apply_summary(&self, session_id: &Uuid, summary: String) {
        if let Some(mut state) = self.sessions.get_mut(session_id) {
            state.memory.set_summary(summary);
        }
    }

    /// Put drained messages back after a failed summarization.
    pub fn restore_overflow(&self, session_id: &Uuid, drained: Vec<Message>) {
        if let Some(mut state) = self.sessions.get_mut(session_id) {
            state.memory.restore(drained);
        }
    }

    /// Clear a session's transcript and memory, keeping the record.
    pub fn clear(&self, session_id: &Uuid) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut state) => {
                state.transcript.clear();
                state.memory.clear();
                state.session.message_count = 0;
                true
            }
            None => false,
        }
    }

    /// Mark a session completed.
    pub fn end(&self, session_id: &Uuid) -> bool {
        match self.sessions.get_mut(session_id) {
            Some(mut state) => {
                state.session.status = SessionStatus::Completed;
                state.session.ended_at = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions exist.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(session_id: Uuid, question: &str, answer: &str) -> (ChatMessage, ChatMessage) {
        (
            ChatMessage::user(session_id, question.to_string()),
            ChatMessage::assistant(
                session_id,
                answer.to_string(),
                "stub-model".to_string(),
                100,
                40,
                "end_turn".to_string(),
                500,
            ),
        )
    }

    #[test]
    fn test_create_and_get() {
        let store = SessionStore::new(2000);
        let session = store.create("gemini-1.5-flash".to_string());

        let fetched = store.get(&session.id).unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.status, SessionStatus::Active);
        assert!(store.get(&Uuid::now_v7()).is_none());
    }

    #[test]
    fn test_record_exchange_updates_counters_and_transcript() {
        let store = SessionStore::new(2000);
        let session = store.create("m".to_string());
        let (user, assistant) = exchange(session.id, "question?", "answer.");

        let work = store.record_exchange(&session.id, user, assistant).unwrap();
        assert!(work.is_none(), "small exchange should not trigger pruning");

        let updated = store.get(&session.id).unwrap();
        assert_eq!(updated.message_count, 2);
        assert_eq!(updated.total_input_tokens, 100);
        assert_eq!(updated.total_output_tokens, 40);

        let transcript = store.messages(&session.id).unwrap();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0].content, "question?");
    }

    #[test]
    fn test_record_exchange_unknown_session() {
        let store = SessionStore::new(2000);
        let id = Uuid::now_v7();
        let (user, assistant) = exchange(id, "q", "a");
        assert!(store.record_exchange(&id, user, assistant).is_none());
    }

    #[test]
    fn test_overflow_produces_prune_work() {
        // Tiny budget: the second exchange overflows the buffer.
        let store = SessionStore::new(30);
        let session = store.create("m".to_string());

        let (u1, a1) = exchange(session.id, &"x".repeat(60), &"y".repeat(60));
        store.record_exchange(&session.id, u1, a1).unwrap();

        let (u2, a2) = exchange(session.id, &"p".repeat(60), &"q".repeat(60));
        let work = store
            .record_exchange(&session.id, u2, a2)
            .unwrap()
            .expect("overflow expected");

        assert!(!work.drained.is_empty());
        assert!(work.previous_summary.is_empty());

        // Apply a summary and check it shows up in history context.
        store.apply_summary(&session.id, "Earlier exchanges summarized.".to_string());
        let (summary, buffer) = store.history_context(&session.id).unwrap();
        assert_eq!(summary.as_deref(), Some("Earlier exchanges summarized."));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_restore_overflow_after_failed_fold() {
        let store = SessionStore::new(30);
        let session = store.create("m".to_string());

        let (u1, a1) = exchange(session.id, &"x".repeat(60), &"y".repeat(60));
        store.record_exchange(&session.id, u1, a1).unwrap();
        let (u2, a2) = exchange(session.id, &"p".repeat(60), &"q".repeat(60));
        let work = store
            .record_exchange(&session.id, u2, a2)
            .unwrap()
            .unwrap();

        let drained_len = work.drained.len();
        store.restore_overflow(&session.id, work.drained);

        let (summary, buffer) = store.history_context(&session.id).unwrap();
        assert!(summary.is_none());
        assert_eq!(buffer.len(), drained_len + 2);
    }

    #[test]
    fn test_clear_resets_transcript_and_memory() {
        let store = SessionStore::new(2000);
        let session = store.create("m".to_string());
        let (user, assistant) = exchange(session.id, "q", "a");
        store.record_exchange(&session.id, user, assistant).unwrap();

        assert!(store.clear(&session.id));
        assert!(store.messages(&session.id).unwrap().is_empty());
        assert_eq!(store.get(&session.id).unwrap().message_count, 0);

        let (summary, buffer) = store.history_context(&session.id).unwrap();
        assert!(summary.is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_end_marks_completed() {
        let store = SessionStore::new(2000);
        let session = store.create("m".to_string());
        assert!(store.end(&session.id));

        let ended = store.get(&session.id).unwrap();
        assert_eq!(ended.status, SessionStatus::Completed);
        assert!(ended.ended_at.is_some());
        assert!(!store.end(&Uuid::now_v7()));
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let store = SessionStore::new(2000);
        let first = store.create("m".to_string());
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = store.create("m".to_string());

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
