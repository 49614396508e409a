//! Error types for the store layer.

use std::error::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by any store backend.
///
/// `Unavailable` is an infrastructure failure and is passed through the
/// use cases untouched. `Conflict` is the optimistic-concurrency signal:
/// someone else committed first.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or failed mid-operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },

    /// The stored version moved since the caller read the aggregate.
    #[error("write conflict on {entity}: expected version {expected}, found {found}")]
    Conflict {
        entity: String,
        expected: u64,
        found: u64,
    },

    /// `create`/`insert` with an id that is already taken.
    #[error("{0} already exists")]
    Duplicate(String),

    /// `update` for an aggregate that was never created.
    #[error("{0} does not exist")]
    Missing(String),
}

impl StoreError {
    /// Constructs an unavailable error from any backend failure.
    pub fn unavailable(message: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StoreError::Unavailable {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Returns `true` for the optimistic-concurrency failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}
