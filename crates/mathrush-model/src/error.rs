//! Error types for aggregate transitions.

use crate::{ConnectionId, GameId, GameStatus, InfiniteGameId, PlayerUid};

/// A transition was refused by an aggregate. Nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The lifecycle does not allow moving from `from` to `to`.
    #[error("game {game} cannot move from {from} to {to}")]
    InvalidTransition {
        game: GameId,
        from: GameStatus,
        to: GameStatus,
    },

    /// The game no longer accepts players.
    #[error("game {0} is not accepting players ({1})")]
    NotJoinable(GameId, GameStatus),

    /// Every player slot is taken.
    #[error("game {0} is full")]
    Full(GameId),

    /// The player is already a participant.
    #[error("player {0} already in game {1}")]
    AlreadyJoined(PlayerUid, GameId),

    /// No participant is bound to this connection.
    #[error("connection {0} is not part of game {1}")]
    NotParticipant(ConnectionId, GameId),

    /// A game needs room for at least two players.
    #[error("invalid game capacity {0}: at least 2 players required")]
    InvalidCapacity(usize),

    /// The infinite session already reached its terminal state.
    #[error("infinite game {0} has already been abandoned")]
    AlreadyAbandoned(InfiniteGameId),
}
