//! The infinite session manager: status queries and abandonment.
//!
//! # Concurrency note
//!
//! The manager holds no state of its own besides the store handle, so it
//! can be shared freely across tasks. Exactly-once abandonment comes from
//! the store's version check: of two racing abandon calls only one write
//! lands, and the other is reported as already abandoned.

use mathrush_model::{InfiniteGame, InfiniteGameId};
use mathrush_store::InfiniteGameStore;
use time::OffsetDateTime;

use crate::{InfiniteGameView, SessionError};

/// Manages the lifecycle of infinite sessions.
///
/// ## Lifecycle
///
/// ```text
///   [Active] ──abandon()──→ [Abandoned]
///      │                         │
///  get_status()             get_status()
///                           abandon() → AlreadyAbandoned
/// ```
pub struct InfiniteSessionManager<S> {
    games: S,
}

impl<S: InfiniteGameStore> InfiniteSessionManager<S> {
    pub fn new(games: S) -> Self {
        Self { games }
    }

    /// Returns the current state of a session. Never writes.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: no session with that id
    /// - [`SessionError::Store`]: the store failed
    pub async fn get_status(
        &self,
        game_id: InfiniteGameId,
    ) -> Result<InfiniteGameView, SessionError> {
        let game = self.load(game_id).await?;
        Ok(InfiniteGameView::from(&game))
    }

    /// Ends a session now.
    ///
    /// Only `abandoned_at` changes; progress counters, questions and
    /// difficulty markers are persisted exactly as they were read. A
    /// successful call is one read and one write.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: no session with that id
    /// - [`SessionError::AlreadyAbandoned`]: the session already ended,
    ///   including when a concurrent call ended it first
    /// - [`SessionError::Store`]: the store failed
    pub async fn abandon(
        &self,
        game_id: InfiniteGameId,
    ) -> Result<InfiniteGameView, SessionError> {
        let mut game = self.load(game_id).await?;

        let abandoned_at = OffsetDateTime::now_utc();
        if let Err(err) = game.abandon(abandoned_at) {
            tracing::debug!(%game_id, %err, "abandon rejected");
            return Err(SessionError::AlreadyAbandoned(game_id));
        }

        match self.games.update(game).await {
            Ok(stored) => {
                tracing::info!(
                    %game_id,
                    player_uid = %stored.player_uid(),
                    correct_answers = stored.correct_answers(),
                    "infinite game abandoned"
                );
                Ok(InfiniteGameView::from(&stored))
            }
            Err(err) if err.is_conflict() => {
                // Someone wrote between our read and write. If that write
                // was an abandonment, report it as such.
                let current = self.load(game_id).await?;
                if current.is_active() {
                    tracing::warn!(%game_id, "abandon lost a write race to a progress update");
                    Err(err.into())
                } else {
                    tracing::debug!(%game_id, "abandon lost the race to a concurrent abandon");
                    Err(SessionError::AlreadyAbandoned(game_id))
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn load(&self, game_id: InfiniteGameId) -> Result<InfiniteGame, SessionError> {
        self.games
            .get_by_id(game_id)
            .await?
            .ok_or(SessionError::NotFound(game_id))
    }
}
