//! Error types for quint-core.

use thiserror::Error;

/// Result type alias using the scheduler error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by validation and scheduling.
///
/// Every error is returned before any new state is produced, so callers
/// never have to roll back a partially scheduled card.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid rating {0}: expected 0 (again), 1 (hard), 2 (good) or 3 (easy)")]
    InvalidRating(i64),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
