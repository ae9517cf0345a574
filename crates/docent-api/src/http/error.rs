//! Application error type mapping to HTTP status codes and envelope
//! format.
//!
//! Answer-path failures intentionally collapse to one generic message in
//! the response body; the specific cause is logged server-side.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use docent_types::error::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversational chain errors.
    Chat(ChatError),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::SessionNotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Chat(e) => {
                tracing::error!(error = %e, "Answer generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "ANSWER_FAILED",
                    e.user_message().to_string(),
                )
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    msg.clone(),
                )
            }
        };

        let body = json!({
            "data": null,
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docent_types::llm::LlmError;

    #[test]
    fn test_session_not_found_maps_to_404() {
        let response = AppError::Chat(ChatError::SessionNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_chat_error_maps_to_500_with_generic_message() {
        let err: ChatError = LlmError::AuthenticationFailed.into();
        let response = AppError::Chat(err).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = AppError::Validation("bad input".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
