//! Data model for MathRush.
//!
//! This crate defines the values every other layer passes around:
//!
//! - **Identity** ([`PlayerUid`], [`ConnectionId`], [`GameId`],
//!   [`InfiniteGameId`]): newtypes so ids can't be mixed up.
//! - **Catalog values** ([`PlayerProfile`], [`PowerUp`], [`Question`],
//!   [`InfiniteQuestion`]): immutable data owned by collaborators.
//! - **Aggregates** ([`Game`], [`InfiniteGame`]): the consistency
//!   boundaries. Their fields are private; state changes go through the
//!   transition methods so the invariants hold after every mutation.
//!
//! # Architecture
//!
//! ```text
//! Store (persistence traits) → Model (this crate) ← Match / Session (use cases)
//! ```

mod error;
mod game;
mod ids;
mod infinite;
mod types;

pub use error::TransitionError;
pub use game::{Game, GameStatus, DEFAULT_CAPACITY};
pub use ids::{ConnectionId, GameId, InfiniteGameId, PlayerUid};
pub use infinite::InfiniteGame;
pub use types::{
    Comparison, InfiniteQuestion, Player, PlayerProfile, PowerUp, PowerUpKind,
    Question,
};
