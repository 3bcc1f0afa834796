//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use tutor_types::error::{DomainError, StoreError, TutorError};

use super::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Tagged domain error; carries its own status and code.
    Domain(DomainError),
    /// Request validation failure at the HTTP boundary.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::Domain(e)
    }
}

impl From<TutorError> for AppError {
    fn from(e: TutorError) -> Self {
        AppError::Domain(e.into())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Domain(e.into())
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &str, String) {
        match self {
            AppError::Domain(e) => (
                StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                e.code(),
                e.message.clone(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(%status, code, %message, "Request failed");
        }

        let request_id = uuid::Uuid::now_v7().to_string();
        let body = serde_json::to_string(&ApiResponse::error(code, &message, request_id, 0))
            .unwrap_or_else(|_| {
                r#"{"errors":[{"code":"SERIALIZATION_ERROR","message":"Failed to serialize response"}]}"#
                    .to_string()
            });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_types::llm::GatewayError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                TutorError::Generation(GatewayError::Timeout).into(),
                StatusCode::BAD_GATEWAY,
                "GENERATION_ERROR",
            ),
            (TutorError::Cancelled.into(), StatusCode::REQUEST_TIMEOUT, "REQUEST_CANCELLED"),
            (
                DomainError::not_found("Lesson", "42").into(),
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
            ),
            (
                StoreError::Unavailable("db locked".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
            ),
        ];

        for (err, status, code) in cases {
            let (s, c, _) = err.parts();
            assert_eq!(s, status);
            assert_eq!(c, code);
        }
    }

    #[test]
    fn test_into_response_sets_status() {
        let resp = AppError::Validation("gradeLevel must be between 1 and 12".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
