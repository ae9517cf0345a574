//! Chat session and message types for Docent.
//!
//! Sessions model a single conversation with the assistant. All session
//! state is held in memory; nothing here is persisted to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

// Re-export MessageRole from the llm module (used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// A chat session between a user and the assistant.
///
/// Tracks lifetime, token usage, and message count for one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_input_tokens: u32,
    pub total_output_tokens: u32,
    pub message_count: u32,
    pub model: String,
    pub status: SessionStatus,
}

impl ChatSession {
    /// Start a new active session against the given model.
    pub fn new(model: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            started_at: Utc::now(),
            ended_at: None,
            total_input_tokens: 0,
            total_output_tokens: 0,
            message_count: 0,
            model,
            status: SessionStatus::Active,
        }
    }
}

/// A single message within a chat session.
///
/// Assistant messages include token usage and response timing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Input tokens consumed by this message (assistant messages only).
    pub input_tokens: Option<u32>,
    /// Output tokens generated for this message (assistant messages only).
    pub output_tokens: Option<u32>,
    /// Model used for this message (assistant messages only).
    pub model: Option<String>,
    /// Why the LLM stopped generating (assistant messages only).
    pub stop_reason: Option<String>,
    /// Response latency in milliseconds (assistant messages only).
    pub response_ms: Option<u64>,
}

impl ChatMessage {
    /// Build a user message for a session.
    pub fn user(session_id: Uuid, content: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::User,
            content,
            created_at: Utc::now(),
            input_tokens: None,
            output_tokens: None,
            model: None,
            stop_reason: None,
            response_ms: None,
        }
    }

    /// Build an assistant message with usage metadata for a session.
    #[allow(clippy::too_many_arguments)]
    pub fn assistant(
        session_id: Uuid,
        content: String,
        model: String,
        input_tokens: u32,
        output_tokens: u32,
        stop_reason: String,
        response_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            role: MessageRole::Assistant,
            content,
            created_at: Utc::now(),
            input_tokens: Some(input_tokens),
            output_tokens: Some(output_tokens),
            model: Some(model),
            stop_reason: Some(stop_reason),
            response_ms: Some(response_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_roundtrip() {
        for status in [SessionStatus::Active, SessionStatus::Completed] {
            let s = status.to_string();
            let parsed: SessionStatus = s.parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_session_status_serde() {
        let status = SessionStatus::Active;
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"active\"");
        let parsed: SessionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SessionStatus::Active);
    }

    #[test]
    fn test_session_status_default() {
        assert_eq!(SessionStatus::default(), SessionStatus::Active);
    }

    #[test]
    fn test_new_session_starts_active() {
        let session = ChatSession::new("gemini-1.5-flash".to_string());
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.message_count, 0);
        assert!(session.ended_at.is_none());
    }

    #[test]
    fn test_user_message_has_no_usage() {
        let session_id = Uuid::now_v7();
        let msg = ChatMessage::user(session_id, "What is the vacation policy?".to_string());
        assert_eq!(msg.role, MessageRole::User);
        assert!(msg.input_tokens.is_none());
        assert!(msg.model.is_none());
    }

    #[test]
    fn test_assistant_message_carries_usage() {
        let session_id = Uuid::now_v7();
        let msg = ChatMessage::assistant(
            session_id,
            "The policy is...".to_string(),
            "gemini-1.5-flash".to_string(),
            120,
            45,
            "end_turn".to_string(),
            830,
        );
        assert_eq!(msg.role, MessageRole::Assistant);
        assert_eq!(msg.input_tokens, Some(120));
        assert_eq!(msg.output_tokens, Some(45));
        assert_eq!(msg.response_ms, Some(830));
    }

    #[test]
    fn test_chat_session_serialize() {
        let session = ChatSession::new("gemini-1.5-flash".to_string());
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"status\":\"active\""));
    }
}
