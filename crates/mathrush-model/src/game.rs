//! The multiplayer game aggregate and its lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{ConnectionId, GameId, Player, PlayerUid, Question, TransitionError};

/// Player slots in a standard head-to-head game.
pub const DEFAULT_CAPACITY: usize = 2;

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a game.
///
/// ```text
/// WaitingForPlayers ──(capacity reached)──→ InProgress ──→ Completed
///         │                                     │
///         └──────────────→ Abandoned ←──────────┘
/// ```
///
/// - **WaitingForPlayers**: open, accepting joins. Fewer participants
///   than capacity.
/// - **InProgress**: every slot taken, questions are being played.
/// - **Completed**: the match ran to the end.
/// - **Abandoned**: a participant left before the end.
///
/// `Completed` and `Abandoned` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    WaitingForPlayers,
    InProgress,
    Completed,
    Abandoned,
}

impl GameStatus {
    /// Returns `true` if the game is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayers)
    }

    /// Returns `true` if no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::WaitingForPlayers, Self::InProgress)
                | (Self::WaitingForPlayers, Self::Abandoned)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Abandoned)
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Completed => write!(f, "Completed"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A multiplayer game.
///
/// Invariants, checked by every transition before it mutates anything:
/// - `players.len() <= capacity`
/// - `WaitingForPlayers` ⇒ `players.len() < capacity`
/// - `InProgress` ⇒ `players.len() == capacity`
///
/// `version` belongs to the store: it is bumped on every committed write
/// and compared on update, so two writers can't both commit against the
/// same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    status: GameStatus,
    players: Vec<Player>,
    capacity: usize,
    power_ups_enabled: bool,
    questions: Vec<Question>,
    version: u64,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl Game {
    /// Opens a new game with `host` as the only participant.
    ///
    /// # Errors
    /// [`TransitionError::InvalidCapacity`] if `capacity < 2`: a one-slot
    /// game would skip the waiting state entirely.
    pub fn open(
        id: GameId,
        host: Player,
        capacity: usize,
        power_ups_enabled: bool,
        questions: Vec<Question>,
        created_at: OffsetDateTime,
    ) -> Result<Self, TransitionError> {
        if capacity < DEFAULT_CAPACITY {
            return Err(TransitionError::InvalidCapacity(capacity));
        }
        Ok(Self {
            id,
            status: GameStatus::WaitingForPlayers,
            players: vec![host],
            capacity,
            power_ups_enabled,
            questions,
            version: 0,
            created_at,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Participants in admission order. The first one opened the game.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn power_ups_enabled(&self) -> bool {
        self.power_ups_enabled
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns `true` if a new player could be admitted right now.
    pub fn has_open_slot(&self) -> bool {
        self.status.is_joinable() && self.players.len() < self.capacity
    }

    /// Returns `true` if `uid` is one of the participants.
    pub fn is_participant(&self, uid: &PlayerUid) -> bool {
        self.players.iter().any(|p| &p.uid == uid)
    }

    /// Returns a copy stamped with a store-assigned version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Adds a participant and starts the game if that fills the last slot.
    ///
    /// Returns the status after admission. The join and the
    /// `WaitingForPlayers → InProgress` transition happen in one call, so
    /// no snapshot of this game ever shows a full roster still waiting.
    ///
    /// # Errors
    /// - [`TransitionError::NotJoinable`]: game is past the waiting state
    /// - [`TransitionError::Full`]: no slot left
    /// - [`TransitionError::AlreadyJoined`]: uid already participates
    pub fn admit(&mut self, player: Player) -> Result<GameStatus, TransitionError> {
        if !self.status.is_joinable() {
            return Err(TransitionError::NotJoinable(self.id, self.status));
        }
        if self.players.len() >= self.capacity {
            return Err(TransitionError::Full(self.id));
        }
        if self.is_participant(&player.uid) {
            return Err(TransitionError::AlreadyJoined(player.uid, self.id));
        }

        self.players.push(player);
        if self.players.len() == self.capacity {
            self.transition(GameStatus::InProgress)?;
        }
        Ok(self.status)
    }

    /// Marks a running game as played to the end.
    pub fn complete(&mut self) -> Result<(), TransitionError> {
        self.transition(GameStatus::Completed)
    }

    /// Ends the game early.
    pub fn abandon(&mut self) -> Result<(), TransitionError> {
        self.transition(GameStatus::Abandoned)
    }

    /// Removes the participant bound to `connection_id` and abandons the
    /// game. Returns the removed participant.
    pub fn release(&mut self, connection_id: &ConnectionId) -> Result<Player, TransitionError> {
        let index = self
            .players
            .iter()
            .position(|p| &p.connection_id == connection_id)
            .ok_or_else(|| TransitionError::NotParticipant(connection_id.clone(), self.id))?;
        self.check_transition(GameStatus::Abandoned)?;

        let player = self.players.remove(index);
        self.status = GameStatus::Abandoned;
        Ok(player)
    }

    fn check_transition(&self, target: GameStatus) -> Result<(), TransitionError> {
        let legal = self.status.can_transition_to(target)
            && (target != GameStatus::InProgress || self.players.len() == self.capacity);
        if legal {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                game: self.id,
                from: self.status,
                to: target,
            })
        }
    }

    fn transition(&mut self, target: GameStatus) -> Result<(), TransitionError> {
        self.check_transition(target)?;
        self.status = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlayerProfile;

    fn player(uid: &str, conn: &str) -> Player {
        Player::new(ConnectionId::new(conn), &PlayerProfile::new(uid, uid, 100))
    }

    fn open_game() -> Game {
        Game::open(
            GameId(1),
            player("host", "c-host"),
            DEFAULT_CAPACITY,
            true,
            Vec::new(),
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap()
    }

    // =====================================================================
    // GameStatus
    // =====================================================================

    #[test]
    fn test_game_status_can_transition_to_follows_lifecycle() {
        use GameStatus::*;
        assert!(WaitingForPlayers.can_transition_to(InProgress));
        assert!(WaitingForPlayers.can_transition_to(Abandoned));
        assert!(InProgress.can_transition_to(Completed));
        assert!(InProgress.can_transition_to(Abandoned));

        assert!(!WaitingForPlayers.can_transition_to(Completed));
        assert!(!InProgress.can_transition_to(WaitingForPlayers));
    }

    #[test]
    fn test_game_status_terminal_states_have_no_exit() {
        use GameStatus::*;
        for terminal in [Completed, Abandoned] {
            assert!(terminal.is_terminal());
            for target in [WaitingForPlayers, InProgress, Completed, Abandoned] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_game_status_is_joinable_only_while_waiting() {
        assert!(GameStatus::WaitingForPlayers.is_joinable());
        assert!(!GameStatus::InProgress.is_joinable());
        assert!(!GameStatus::Completed.is_joinable());
        assert!(!GameStatus::Abandoned.is_joinable());
    }

    #[test]
    fn test_game_status_display() {
        assert_eq!(GameStatus::WaitingForPlayers.to_string(), "WaitingForPlayers");
        assert_eq!(GameStatus::InProgress.to_string(), "InProgress");
    }

    // =====================================================================
    // Game::open()
    // =====================================================================

    #[test]
    fn test_open_starts_waiting_with_host() {
        let game = open_game();
        assert_eq!(game.status(), GameStatus::WaitingForPlayers);
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.version(), 0);
        assert!(game.has_open_slot());
    }

    #[test]
    fn test_open_rejects_single_slot_capacity() {
        let result = Game::open(
            GameId(1),
            player("host", "c-host"),
            1,
            false,
            Vec::new(),
            OffsetDateTime::UNIX_EPOCH,
        );
        assert_eq!(result, Err(TransitionError::InvalidCapacity(1)));
    }

    // =====================================================================
    // Game::admit()
    // =====================================================================

    #[test]
    fn test_admit_filling_last_slot_starts_game() {
        let mut game = open_game();

        let status = game.admit(player("guest", "c-guest")).unwrap();

        assert_eq!(status, GameStatus::InProgress);
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.players().len(), 2);
        assert!(!game.has_open_slot());
    }

    #[test]
    fn test_admit_below_capacity_keeps_waiting() {
        let mut game = Game::open(
            GameId(1),
            player("host", "c-host"),
            3,
            true,
            Vec::new(),
            OffsetDateTime::UNIX_EPOCH,
        )
        .unwrap();

        let status = game.admit(player("guest", "c-guest")).unwrap();

        assert_eq!(status, GameStatus::WaitingForPlayers);
        assert!(game.has_open_slot());
    }

    #[test]
    fn test_admit_duplicate_uid_is_rejected_without_mutation() {
        let mut game = open_game();
        let before = game.clone();

        let result = game.admit(player("host", "c-other"));

        assert!(matches!(result, Err(TransitionError::AlreadyJoined(..))));
        assert_eq!(game, before);
    }

    #[test]
    fn test_admit_into_running_game_is_rejected() {
        let mut game = open_game();
        game.admit(player("guest", "c-guest")).unwrap();

        let result = game.admit(player("late", "c-late"));

        assert_eq!(
            result,
            Err(TransitionError::NotJoinable(GameId(1), GameStatus::InProgress))
        );
        assert_eq!(game.players().len(), 2);
    }

    #[test]
    fn test_admit_into_completed_game_is_rejected() {
        let mut game = open_game();
        game.admit(player("guest", "c-guest")).unwrap();
        game.complete().unwrap();

        let result = game.admit(player("late", "c-late"));

        assert!(matches!(result, Err(TransitionError::NotJoinable(_, GameStatus::Completed))));
    }

    // =====================================================================
    // complete() / abandon() / release()
    // =====================================================================

    #[test]
    fn test_complete_requires_running_game() {
        let mut game = open_game();

        let result = game.complete();

        assert_eq!(
            result,
            Err(TransitionError::InvalidTransition {
                game: GameId(1),
                from: GameStatus::WaitingForPlayers,
                to: GameStatus::Completed,
            })
        );
        assert_eq!(game.status(), GameStatus::WaitingForPlayers);
    }

    #[test]
    fn test_abandon_after_complete_is_rejected() {
        let mut game = open_game();
        game.admit(player("guest", "c-guest")).unwrap();
        game.complete().unwrap();

        assert!(game.abandon().is_err());
        assert_eq!(game.status(), GameStatus::Completed);
    }

    #[test]
    fn test_release_removes_player_and_abandons() {
        let mut game = open_game();
        game.admit(player("guest", "c-guest")).unwrap();

        let removed = game.release(&ConnectionId::new("c-guest")).unwrap();

        assert_eq!(removed.uid, PlayerUid::new("guest"));
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.status(), GameStatus::Abandoned);
    }

    #[test]
    fn test_release_unknown_connection_is_rejected() {
        let mut game = open_game();

        let result = game.release(&ConnectionId::new("nobody"));

        assert!(matches!(result, Err(TransitionError::NotParticipant(..))));
        assert_eq!(game.status(), GameStatus::WaitingForPlayers);
    }

    #[test]
    fn test_release_from_terminal_game_keeps_roster() {
        let mut game = open_game();
        game.admit(player("guest", "c-guest")).unwrap();
        game.complete().unwrap();

        let result = game.release(&ConnectionId::new("c-guest"));

        assert!(matches!(result, Err(TransitionError::InvalidTransition { .. })));
        assert_eq!(game.players().len(), 2);
    }
}
