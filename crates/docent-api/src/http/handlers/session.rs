//! Session endpoints: listing, transcripts, and clearing.

use axum::extract::{Path, State};
use axum::Json;

use docent_types::chat::{ChatMessage, ChatSession};
use docent_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

fn parse_session_id(id: &str) -> Result<uuid::Uuid, AppError> {
    id.parse::<uuid::Uuid>()
        .map_err(|_| AppError::Validation("Invalid session_id format".to_string()))
}

/// GET /api/v1/sessions -- list sessions, most recent first.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Json<Vec<ChatSession>> {
    Json(state.service.sessions().list())
}

/// GET /api/v1/sessions/{id}/messages -- session transcript.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let session_id = parse_session_id(&id)?;
    state
        .service
        .sessions()
        .messages(&session_id)
        .map(Json)
        .ok_or(AppError::Chat(ChatError::SessionNotFound))
}

/// POST /api/v1/sessions/{id}/clear -- reset transcript and memory.
pub async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session_id = parse_session_id(&id)?;
    if !state.service.sessions().clear(&session_id) {
        return Err(AppError::Chat(ChatError::SessionNotFound));
    }
    Ok(Json(serde_json::json!({ "cleared": true })))
}
