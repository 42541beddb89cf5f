//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A navigation request reached past the unlocked progress.
    #[error("access denied to session {session}, level {level}")]
    AccessDenied {
        /// The requested session index.
        session: u32,
        /// The requested level index.
        level: u32,
    },

    /// Requested content does not exist.
    #[error("content not found: {0}")]
    ContentNotFound(String),

    /// Content exists but could not be parsed or failed validation.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// The progress store could not be reached or rejected the request.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),
}
