//! Capability traits for the collaborators the use cases depend on.
//!
//! # Trait bounds
//!
//! Every trait is `Send + Sync + 'static` and every returned future is
//! `Send`: a single store is shared by many request tasks, and Tokio may
//! poll those tasks on any worker thread. Implementations are free to use
//! plain `async fn` in their `impl` blocks.

use std::future::Future;

use mathrush_model::{
    Game, GameId, InfiniteGame, InfiniteGameId, PlayerProfile, PlayerUid, Question,
};

use crate::StoreResult;

/// Lookup of player profiles by stable identity.
pub trait PlayerDirectory: Send + Sync + 'static {
    /// Returns the profile for `uid`, or `None` if nobody has that uid.
    fn get_by_uid(
        &self,
        uid: &PlayerUid,
    ) -> impl Future<Output = StoreResult<Option<PlayerProfile>>> + Send;
}

/// Persistence for multiplayer games.
pub trait GameStore: Send + Sync + 'static {
    /// Reserves a fresh game id. Ids increase monotonically.
    ///
    /// A reserved id is never handed out again, even if the game it was
    /// reserved for is never created, so the id sequence may have gaps.
    fn next_id(&self) -> impl Future<Output = StoreResult<GameId>> + Send;

    /// Returns every stored game ordered by id (creation order).
    fn list_all(&self) -> impl Future<Output = StoreResult<Vec<Game>>> + Send;

    /// Returns one game by id.
    fn get_by_id(&self, id: GameId) -> impl Future<Output = StoreResult<Option<Game>>> + Send;

    /// Persists a new game and returns the stored copy.
    ///
    /// # Errors
    /// [`StoreError::Duplicate`](crate::StoreError::Duplicate) if the id is
    /// already in use.
    fn create(&self, game: Game) -> impl Future<Output = StoreResult<Game>> + Send;

    /// Replaces a stored game, provided nobody else wrote it since `game`
    /// was read. Returns the stored copy with its new version.
    ///
    /// # Errors
    /// - [`StoreError::Conflict`](crate::StoreError::Conflict): version moved
    /// - [`StoreError::Missing`](crate::StoreError::Missing): unknown id
    fn update(&self, game: Game) -> impl Future<Output = StoreResult<Game>> + Send;
}

/// Persistence for single-player infinite sessions.
pub trait InfiniteGameStore: Send + Sync + 'static {
    /// Returns one session by id.
    fn get_by_id(
        &self,
        id: InfiniteGameId,
    ) -> impl Future<Output = StoreResult<Option<InfiniteGame>>> + Send;

    /// Persists a new session.
    fn insert(&self, game: InfiniteGame) -> impl Future<Output = StoreResult<InfiniteGame>> + Send;

    /// Replaces a stored session with the same version check as
    /// [`GameStore::update`].
    fn update(&self, game: InfiniteGame) -> impl Future<Output = StoreResult<InfiniteGame>> + Send;
}

/// What a question batch is being requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionContext {
    /// The game the batch will be attached to.
    pub game_id: GameId,
    /// How many questions to produce.
    pub batch_size: usize,
}

/// Source of gameplay questions.
///
/// Opaque to the core: how questions are generated is the supplier's
/// business. The only contract is a deterministic, ordered batch.
pub trait QuestionSupply: Send + Sync + 'static {
    fn next_batch(
        &self,
        context: QuestionContext,
    ) -> impl Future<Output = StoreResult<Vec<Question>>> + Send;
}
