//! The service surface a transport layer calls into.
//!
//! Every operation takes raw caller input, rejects malformed values as
//! [`MathRushError::InvalidArgument`] before any collaborator is touched,
//! then delegates to the matchmaking or session component.

use mathrush_match::{CatalogGrantor, MatchAllocator, PowerUpGrantor};
use mathrush_model::{ConnectionId, Game, GameId, InfiniteGameId, PlayerUid};
use mathrush_session::{InfiniteGameView, InfiniteSessionManager};
use mathrush_store::{
    FixedQuestionSupply, GameStore, InMemoryGameStore, InMemoryInfiniteGameStore,
    InMemoryPlayerDirectory, InfiniteGameStore, PlayerDirectory, QuestionSupply,
};

use crate::{MathRushConfig, MathRushError};

/// The MathRush service.
///
/// Generic over its collaborators so production backends and the
/// in-memory ones used in tests plug in the same way:
///
/// | param | role                          |
/// |-------|-------------------------------|
/// | `D`   | player profile directory      |
/// | `S`   | multiplayer game store        |
/// | `Q`   | question supply for new games |
/// | `P`   | starting power-up grantor     |
/// | `I`   | infinite session store        |
pub struct MathRush<D, S, Q, P, I> {
    allocator: MatchAllocator<D, S, Q, P>,
    sessions: InfiniteSessionManager<I>,
    config: MathRushConfig,
}

/// The service wired to in-memory collaborators.
pub type InMemoryMathRush = MathRush<
    InMemoryPlayerDirectory,
    InMemoryGameStore,
    FixedQuestionSupply,
    CatalogGrantor,
    InMemoryInfiniteGameStore,
>;

impl<D, S, Q, P, I> MathRush<D, S, Q, P, I>
where
    D: PlayerDirectory,
    S: GameStore,
    Q: QuestionSupply,
    P: PowerUpGrantor,
    I: InfiniteGameStore,
{
    /// Wires the service.
    ///
    /// # Errors
    /// [`MathRushError::Config`] if `config` fails validation.
    pub fn new(
        directory: D,
        games: S,
        questions: Q,
        grantor: P,
        infinite_games: I,
        config: MathRushConfig,
    ) -> Result<Self, MathRushError> {
        config.validate()?;
        let allocator = MatchAllocator::new(
            directory,
            games,
            questions,
            grantor,
            config.matchmaking.clone(),
        )?;
        Ok(Self {
            allocator,
            sessions: InfiniteSessionManager::new(infinite_games),
            config,
        })
    }

    pub fn config(&self) -> &MathRushConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Multiplayer
    // -----------------------------------------------------------------------

    /// Places the player on `connection_id` into a game.
    ///
    /// # Errors
    /// - `InvalidArgument`: blank connection id or uid
    /// - `NotFound`: no profile for the uid
    /// - `Store`: a collaborator failed
    pub async fn find_match(
        &self,
        connection_id: &str,
        player_uid: &str,
    ) -> Result<Game, MathRushError> {
        let connection_id = parse_connection_id(connection_id)?;
        let player_uid = parse_player_uid(player_uid)?;
        Ok(self.allocator.find_match(connection_id, &player_uid).await?)
    }

    /// Ends a running game normally.
    pub async fn complete_game(&self, game_id: u64) -> Result<Game, MathRushError> {
        let game_id = parse_game_id(game_id)?;
        Ok(self.allocator.complete_game(game_id).await?)
    }

    /// Removes the participant on `connection_id` and abandons the game.
    pub async fn leave_game(
        &self,
        game_id: u64,
        connection_id: &str,
    ) -> Result<Game, MathRushError> {
        let game_id = parse_game_id(game_id)?;
        let connection_id = parse_connection_id(connection_id)?;
        Ok(self.allocator.leave_game(game_id, &connection_id).await?)
    }

    // -----------------------------------------------------------------------
    // Infinite mode
    // -----------------------------------------------------------------------

    /// Returns the current state of an infinite session.
    ///
    /// # Errors
    /// - `InvalidArgument`: id is zero or negative
    /// - `NotFound`: no session with that id
    pub async fn get_infinite_status(
        &self,
        game_id: i64,
    ) -> Result<InfiniteGameView, MathRushError> {
        let game_id = parse_infinite_game_id(game_id)?;
        Ok(self.sessions.get_status(game_id).await?)
    }

    /// Abandons an infinite session.
    ///
    /// # Errors
    /// - `InvalidArgument`: id is zero or negative
    /// - `NotFound`: no session with that id
    /// - `BusinessRuleViolation`: the session has already been abandoned
    pub async fn abandon_infinite_game(
        &self,
        game_id: i64,
    ) -> Result<InfiniteGameView, MathRushError> {
        let game_id = parse_infinite_game_id(game_id)?;
        Ok(self.sessions.abandon(game_id).await?)
    }
}

// ---------------------------------------------------------------------------
// In-memory wiring
// ---------------------------------------------------------------------------

/// Shared handles to a full set of in-memory collaborators.
///
/// Cloning the backend clones the handles, not the data, so a test can keep
/// one to seed fixtures and inspect writes while the service uses another.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    pub directory: InMemoryPlayerDirectory,
    pub games: InMemoryGameStore,
    pub questions: FixedQuestionSupply,
    pub infinite_games: InMemoryInfiniteGameStore,
}

impl InMemoryBackend {
    /// Builds a service over these collaborators, granting power-ups from
    /// the full catalog.
    pub fn service(&self, config: MathRushConfig) -> Result<InMemoryMathRush, MathRushError> {
        let grantor = CatalogGrantor::new(config.matchmaking.initial_power_ups);
        MathRush::new(
            self.directory.clone(),
            self.games.clone(),
            self.questions.clone(),
            grantor,
            self.infinite_games.clone(),
            config,
        )
    }
}

// ---------------------------------------------------------------------------
// Argument checks
// ---------------------------------------------------------------------------

fn parse_player_uid(raw: &str) -> Result<PlayerUid, MathRushError> {
    if raw.trim().is_empty() {
        return Err(MathRushError::InvalidArgument(
            "player uid must not be blank".into(),
        ));
    }
    Ok(PlayerUid::new(raw))
}

fn parse_connection_id(raw: &str) -> Result<ConnectionId, MathRushError> {
    if raw.trim().is_empty() {
        return Err(MathRushError::InvalidArgument(
            "connection id must not be blank".into(),
        ));
    }
    Ok(ConnectionId::new(raw))
}

fn parse_game_id(raw: u64) -> Result<GameId, MathRushError> {
    if raw == 0 {
        return Err(MathRushError::InvalidArgument(
            "game id must be positive".into(),
        ));
    }
    Ok(GameId(raw))
}

fn parse_infinite_game_id(raw: i64) -> Result<InfiniteGameId, MathRushError> {
    let id = InfiniteGameId(raw);
    if !id.is_valid() {
        return Err(MathRushError::InvalidArgument(format!(
            "infinite game id must be positive, got {raw}"
        )));
    }
    Ok(id)
}
