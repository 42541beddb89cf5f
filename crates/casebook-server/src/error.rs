//! Casebook — host error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use casebook_core::error::DomainError;
use casebook_director::GateRefusal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Startup errors for the host binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The course could not be loaded.
    #[error("content error: {0}")]
    Content(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer errors.
#[derive(Debug)]
pub enum ApiError {
    /// A domain operation failed.
    Domain(DomainError),
    /// No game with this id is running.
    GameNotFound(Uuid),
    /// The environment gate refused the client.
    ClientRefused(GateRefusal),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<GateRefusal> for ApiError {
    fn from(refusal: GateRefusal) -> Self {
        Self::ClientRefused(refusal)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::AccessDenied { .. } => (StatusCode::FORBIDDEN, "access_denied"),
                    DomainError::ContentNotFound(_) => (StatusCode::NOT_FOUND, "content_not_found"),
                    DomainError::InvalidContent(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "invalid_content")
                    }
                    DomainError::Persistence(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "persistence_error")
                    }
                    DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
                };
                (status, code, err.to_string())
            }
            Self::GameNotFound(id) => (
                StatusCode::NOT_FOUND,
                "game_not_found",
                format!("game not found: {id}"),
            ),
            Self::ClientRefused(refusal) => {
                (StatusCode::FORBIDDEN, "client_refused", refusal.message)
            }
        };

        let body = ErrorBody {
            error: error_code,
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_game_not_found_maps_to_404() {
        assert_eq!(
            status_of(ApiError::GameNotFound(Uuid::new_v4())),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_refused_maps_to_403() {
        let refusal = GateRefusal {
            message: "unsupported browser".into(),
        };
        assert_eq!(status_of(refusal.into()), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_persistence_maps_to_503() {
        assert_eq!(
            status_of(DomainError::Persistence("store down".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into()).into()),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_content_not_found_maps_to_404() {
        assert_eq!(
            status_of(DomainError::ContentNotFound("course.yaml".into()).into()),
            StatusCode::NOT_FOUND
        );
    }
}
