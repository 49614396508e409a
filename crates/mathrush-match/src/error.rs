//! Error types for the matchmaking layer.

use mathrush_model::{GameId, PlayerUid, TransitionError};
use mathrush_store::StoreError;

/// Errors that can occur during matchmaking and game lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// No profile exists for the requesting player.
    #[error("player {0} not found")]
    PlayerNotFound(PlayerUid),

    /// The game does not exist.
    #[error("game {0} not found")]
    GameNotFound(GameId),

    /// The game's lifecycle refused the operation.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A collaborator failed. Passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The allocator was configured with values it can't honor.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
