//! Match allocator: pairs an arriving player with an open game or opens one.

use std::collections::HashMap;

use mathrush_model::{ConnectionId, Game, GameId, Player, PlayerProfile, PlayerUid};
use mathrush_store::{GameStore, PlayerDirectory, QuestionContext, QuestionSupply};
use time::OffsetDateTime;

use crate::{
    MatchConfig, MatchError, PowerUpGrantor, Selection, open_candidates,
    select_first_compatible,
};

/// The matchmaking entry point.
///
/// Holds its collaborators by value; in-memory and production stores are
/// cheap handles, so the same store can back several components.
///
/// ## Flow of `find_match`
///
/// ```text
/// resolve requester ──→ tolerance band ──→ snapshot open games
///        │                                        │
///        ▼ (unknown)                              ▼
///    PlayerNotFound                 select first compatible ──┐
///                                         │ (none)            │ (found)
///                                         ▼                   ▼
///                                   open new game      admit + start
///                                   (one create)       (one update, CAS)
/// ```
///
/// # Concurrency
///
/// The scan runs without any lock; at worst it picks a game someone else
/// just filled. The commit is a versioned update, so only one of two racing
/// arrivals can start a given game. The loser rescans, and after
/// `max_commit_attempts` lost races opens a game of its own.
pub struct MatchAllocator<D, S, Q, P> {
    directory: D,
    games: S,
    questions: Q,
    grantor: P,
    config: MatchConfig,
}

impl<D, S, Q, P> MatchAllocator<D, S, Q, P>
where
    D: PlayerDirectory,
    S: GameStore,
    Q: QuestionSupply,
    P: PowerUpGrantor,
{
    /// Creates an allocator.
    ///
    /// # Errors
    /// [`MatchError::InvalidConfig`] if `config` fails validation.
    pub fn new(
        directory: D,
        games: S,
        questions: Q,
        grantor: P,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            directory,
            games,
            questions,
            grantor,
            config,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Finds a game for `player_uid` and joins it, or opens a new one.
    ///
    /// Returns the game as persisted: `InProgress` with a full roster when
    /// an open game was joined, `WaitingForPlayers` with the requester
    /// alone when a new one was opened.
    ///
    /// # Errors
    /// - [`MatchError::PlayerNotFound`]: unknown uid; the game store is
    ///   never touched
    /// - [`MatchError::Store`]: a collaborator failed; nothing is retried
    pub async fn find_match(
        &self,
        connection_id: ConnectionId,
        player_uid: &PlayerUid,
    ) -> Result<Game, MatchError> {
        let profile = self
            .directory
            .get_by_uid(player_uid)
            .await?
            .ok_or_else(|| MatchError::PlayerNotFound(player_uid.clone()))?;
        let tolerance = self.config.tolerance.tolerance_for(profile.points);

        tracing::debug!(
            %player_uid,
            %connection_id,
            points = profile.points,
            tolerance,
            "searching for a match"
        );

        for attempt in 1..=self.config.max_commit_attempts {
            let Some(game) = self.find_open_game(&profile, tolerance).await? else {
                break;
            };
            let game_id = game.id();

            match self.join(game, connection_id.clone(), &profile).await {
                Ok(joined) => return Ok(joined),
                Err(MatchError::Store(err)) if err.is_conflict() => {
                    tracing::warn!(
                        %player_uid,
                        %game_id,
                        attempt,
                        "lost the race for an open game, rescanning"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        self.open_game(connection_id, &profile).await
    }

    /// Marks a running game as played to the end.
    pub async fn complete_game(&self, game_id: GameId) -> Result<Game, MatchError> {
        let mut game = self.load(game_id).await?;
        game.complete()?;
        let stored = self.games.update(game).await?;
        tracing::info!(%game_id, "game completed");
        Ok(stored)
    }

    /// Removes the participant on `connection_id` and abandons the game.
    pub async fn leave_game(
        &self,
        game_id: GameId,
        connection_id: &ConnectionId,
    ) -> Result<Game, MatchError> {
        let mut game = self.load(game_id).await?;
        let player = game.release(connection_id)?;
        let stored = self.games.update(game).await?;
        tracing::info!(
            %game_id,
            player_uid = %player.uid,
            %connection_id,
            "player left, game abandoned"
        );
        Ok(stored)
    }

    async fn load(&self, game_id: GameId) -> Result<Game, MatchError> {
        self.games
            .get_by_id(game_id)
            .await?
            .ok_or(MatchError::GameNotFound(game_id))
    }

    /// Snapshots the store and returns the first game `profile` may join.
    ///
    /// Participant profiles are read lazily in scan order, each uid at most
    /// once, and the scan stops at the first compatible game. A directory
    /// failure for a participant of a later game cannot fail a match that
    /// an earlier game already settles.
    async fn find_open_game(
        &self,
        profile: &PlayerProfile,
        tolerance: i64,
    ) -> Result<Option<Game>, MatchError> {
        let candidates = open_candidates(self.games.list_all().await?, &profile.uid);
        let mut ratings: HashMap<PlayerUid, Option<i64>> = HashMap::new();

        loop {
            match select_first_compatible(&candidates, &ratings, profile.points, tolerance) {
                Selection::Chosen(game) => return Ok(Some(game.clone())),
                Selection::NeedsRating(uid) => {
                    let uid = uid.clone();
                    let points = self.directory.get_by_uid(&uid).await?.map(|rival| rival.points);
                    if points.is_none() {
                        tracing::warn!(
                            player_uid = %uid,
                            "open game participant has no profile, skipping their game"
                        );
                    }
                    ratings.insert(uid, points);
                }
                Selection::NoMatch => {
                    tracing::debug!(
                        player_uid = %profile.uid,
                        open_games = candidates.len(),
                        "no open game within tolerance"
                    );
                    return Ok(None);
                }
            }
        }
    }

    /// Admits the requester into `game` and commits join and start as one
    /// versioned write.
    async fn join(
        &self,
        mut game: Game,
        connection_id: ConnectionId,
        profile: &PlayerProfile,
    ) -> Result<Game, MatchError> {
        let player = self.participant(connection_id, profile, game.power_ups_enabled());
        let status = game.admit(player)?;
        let stored = self.games.update(game).await?;

        tracing::info!(
            game_id = %stored.id(),
            player_uid = %profile.uid,
            players = stored.players().len(),
            %status,
            "player joined"
        );
        Ok(stored)
    }

    /// Opens a new game with the requester as host.
    ///
    /// The id is reserved before the question batch is drawn, since the
    /// supply is keyed by it. If drawing or creating fails, the reserved id
    /// is skipped and nothing is written.
    async fn open_game(
        &self,
        connection_id: ConnectionId,
        profile: &PlayerProfile,
    ) -> Result<Game, MatchError> {
        let game_id = self.games.next_id().await?;
        let questions = self
            .questions
            .next_batch(QuestionContext {
                game_id,
                batch_size: self.config.question_batch_size,
            })
            .await?;
        let host = self.participant(connection_id, profile, self.config.power_ups_enabled);
        let game = Game::open(
            game_id,
            host,
            self.config.capacity,
            self.config.power_ups_enabled,
            questions,
            OffsetDateTime::now_utc(),
        )?;
        let stored = self.games.create(game).await?;

        tracing::info!(
            %game_id,
            player_uid = %profile.uid,
            questions = stored.questions().len(),
            "game created, waiting for players"
        );
        Ok(stored)
    }

    fn participant(
        &self,
        connection_id: ConnectionId,
        profile: &PlayerProfile,
        power_ups_enabled: bool,
    ) -> Player {
        let player = Player::new(connection_id, profile);
        if power_ups_enabled {
            player.with_power_ups(self.grantor.grant_initial_power_ups(&profile.uid))
        } else {
            player
        }
    }
}
