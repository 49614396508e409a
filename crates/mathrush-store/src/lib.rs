//! Collaborator capabilities for MathRush.
//!
//! The use cases in `mathrush-match` and `mathrush-session` never touch a
//! database directly. They talk to the traits defined here:
//!
//! - [`PlayerDirectory`]: profile lookup by uid
//! - [`GameStore`]: multiplayer game persistence
//! - [`InfiniteGameStore`]: single-player session persistence
//! - [`QuestionSupply`]: question batches for new games
//!
//! Each trait has an in-memory implementation (used by tests and local
//! runs); production backends implement the same traits.
//!
//! # Optimistic concurrency
//!
//! Both stores version their aggregates. `update` only succeeds if the
//! caller's copy carries the version currently stored; otherwise it fails
//! with [`StoreError::Conflict`] and writes nothing. This is what makes
//! "join + start" and "abandon" exactly-once under concurrent requests.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{
    FixedQuestionSupply, InMemoryGameStore, InMemoryInfiniteGameStore,
    InMemoryPlayerDirectory, StoreStats,
};
pub use traits::{
    GameStore, InfiniteGameStore, PlayerDirectory, QuestionContext, QuestionSupply,
};
