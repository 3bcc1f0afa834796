use serde::Serialize;
use thiserror::Error;

use crate::llm::GatewayError;

/// Errors surfaced by tutor operations.
///
/// Content store failures are deliberately absent: retrieval degrades to a
/// placeholder and never reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TutorError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("generation failed: {0}")]
    Generation(#[from] GatewayError),

    #[error("request cancelled")]
    Cancelled,
}

/// Errors from the curriculum content store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    #[error("query error: {0}")]
    Query(String),
}

/// Category of a domain error, used at transport boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Configuration,
    Generation,
    Cancelled,
    Internal,
}

impl ErrorKind {
    /// Machine-readable code for API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Configuration => "CONFIGURATION_ERROR",
            ErrorKind::Generation => "GENERATION_ERROR",
            ErrorKind::Cancelled => "REQUEST_CANCELLED",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Numeric HTTP-style status for this kind.
    pub fn status(&self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Cancelled => 408,
            ErrorKind::Generation => 502,
            ErrorKind::Configuration | ErrorKind::Internal => 500,
        }
    }
}

/// A single tagged error carrying a kind, message and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct DomainError {
    pub kind: ErrorKind,
    pub message: String,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("{entity} with id {id} not found"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }
}

impl From<TutorError> for DomainError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::Validation(msg) => Self::new(ErrorKind::Validation, msg),
            TutorError::Configuration(msg) => Self::new(ErrorKind::Configuration, msg),
            // Keep the gateway's own wording so callers can tell failures apart.
            TutorError::Generation(gateway) => {
                Self::new(ErrorKind::Generation, gateway.to_string())
            }
            TutorError::Cancelled => Self::new(ErrorKind::Cancelled, "request cancelled"),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        Self::internal(err.to_string())
    }
}
