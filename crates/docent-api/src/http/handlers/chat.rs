//! SSE streaming chat endpoint.
//!
//! POST /api/v1/chat/stream
//!
//! Streams answers as Server-Sent Events (SSE). Follows the same flow as
//! the CLI loop: resolve/create session -> run the retrieval chain ->
//! stream deltas -> record the exchange after completion.
//!
//! SSE event types:
//! - `session` -- initial event with `{ "session_id": "..." }`
//! - `sources` -- retrieved passages: `[{ "source", "section", "snippet", "similarity" }]`
//! - `text_delta` -- incremental text: `{ "text": "..." }`
//! - `usage` -- token usage: `{ "input_tokens": N, "output_tokens": N }`
//! - `done` -- stream complete: `{}`
//! - `error` -- generic failure message: `{ "message": "..." }`

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

use docent_core::chat::AssistantService;
use docent_types::chat::ChatMessage;
use docent_types::llm::StreamEvent;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamChatRequest {
    /// Existing session ID to continue; if absent, a new session is
    /// created.
    pub session_id: Option<String>,
    /// The user question.
    pub message: String,
}

/// POST /api/v1/chat/stream -- SSE streaming chat.
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(body): Json<StreamChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be empty".to_string()));
    }

    let service = state.service.clone();

    // Resolve or create session
    let session_id = match &body.session_id {
        Some(sid) => {
            let id = sid
                .parse::<uuid::Uuid>()
                .map_err(|_| AppError::Validation("Invalid session_id format".to_string()))?;
            if service.sessions().get(&id).is_none() {
                return Err(AppError::Chat(
                    docent_types::error::ChatError::SessionNotFound,
                ));
            }
            id
        }
        None => service.sessions().create(service.model().to_string()).id,
    };

    let turn = service.answer(session_id, &body.message).await?;

    let question = turn.question.clone();
    let sources = turn.sources.clone();
    let model = service.model().to_string();
    let llm_stream = turn.stream;

    // Build the SSE stream
    let sse_stream = async_stream::stream! {
        // Emit session and sources events up front
        let session_json = serde_json::json!({ "session_id": session_id.to_string() });
        yield Ok::<_, Infallible>(
            Event::default().event("session").data(session_json.to_string())
        );
        let sources_json = serde_json::to_string(&sources).unwrap_or_else(|_| "[]".to_string());
        yield Ok(Event::default().event("sources").data(sources_json));

        let start_time = Instant::now();
        let mut full_response = String::new();
        let mut input_tokens: u32 = 0;
        let mut output_tokens: u32 = 0;
        let mut stop_reason = "end_turn".to_string();
        let mut had_error = false;

        let mut llm_stream = std::pin::pin!(llm_stream);

        while let Some(event_result) = llm_stream.next().await {
            match event_result {
                Ok(stream_event) => match stream_event {
                    StreamEvent::TextDelta { text: delta } => {
                        let data = serde_json::json!({ "text": delta });
                        yield Ok(Event::default().event("text_delta").data(data.to_string()));
                        full_response.push_str(&delta);
                    }
                    StreamEvent::Usage(usage) => {
                        input_tokens = usage.input_tokens;
                        output_tokens = usage.output_tokens;
                        let data = serde_json::to_string(&usage).unwrap_or_default();
                        yield Ok(Event::default().event("usage").data(data));
                    }
                    StreamEvent::MessageDelta { stop_reason: sr } => {
                        stop_reason = sr.to_string();
                    }
                    StreamEvent::Done => {
                        break;
                    }
                    _ => {}
                },
                Err(e) => {
                    let chat_error = docent_types::error::ChatError::from(e);
                    let message = AssistantService::report_failure(&chat_error);
                    let data = serde_json::json!({ "message": message });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    had_error = true;
                    break;
                }
            }
        }

        if !had_error && !full_response.is_empty() {
            let response_ms = start_time.elapsed().as_millis() as u64;
            let _ = service
                .record_exchange(
                    session_id,
                    ChatMessage::user(session_id, question),
                    ChatMessage::assistant(
                        session_id,
                        full_response,
                        model,
                        input_tokens,
                        output_tokens,
                        stop_reason,
                        response_ms,
                    ),
                )
                .await;
        }

        // Emit done event
        yield Ok(Event::default().event("done").data("{}"));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}
