//! Error types for the session layer.

use mathrush_model::InfiniteGameId;
use mathrush_store::StoreError;

/// Errors that can occur while querying or ending an infinite session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session is stored under the id.
    #[error("infinite game {0} not found")]
    NotFound(InfiniteGameId),

    /// The session already ended. Abandonment happens once; the original
    /// timestamp stays.
    #[error("infinite game {0} has already been abandoned")]
    AlreadyAbandoned(InfiniteGameId),

    /// The store failed. Passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}
