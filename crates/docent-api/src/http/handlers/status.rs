//! Status endpoint: corpus, index, and provider summary.

use axum::extract::State;
use axum::Json;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/v1/status -- index and provider summary.
pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let passages = state
        .service
        .retriever()
        .index()
        .count()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "assistant": state.config.assistant.name,
        "documents": state.index_report.documents,
        "passages": passages,
        "embedding_model": state.index_report.embedding_model,
        "provider": state.config.provider.kind.to_string(),
        "model": state.config.provider.model,
        "sessions": state.service.sessions().len(),
    })))
}
