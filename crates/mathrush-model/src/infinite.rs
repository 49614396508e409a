//! The single-player infinite session aggregate.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{InfiniteGameId, InfiniteQuestion, PlayerUid, TransitionError};

/// A long-running single-player session.
///
/// Counters only ever grow while the session is active. Once
/// `abandoned_at` is set the session is terminal: it is kept for history
/// but nothing about it changes again, so it is never deleted either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfiniteGame {
    id: InfiniteGameId,
    player_uid: PlayerUid,
    questions: Vec<InfiniteQuestion>,
    current_batch: u32,
    current_question_index: u32,
    correct_answers: u32,
    current_world_id: u32,
    current_difficulty_step: u32,
    #[serde(with = "time::serde::rfc3339")]
    game_started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    abandoned_at: Option<OffsetDateTime>,
    version: u64,
}

impl InfiniteGame {
    /// Creates a fresh session at the first question of the first world.
    pub fn new(
        id: InfiniteGameId,
        player_uid: PlayerUid,
        questions: Vec<InfiniteQuestion>,
        game_started_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            player_uid,
            questions,
            current_batch: 1,
            current_question_index: 0,
            correct_answers: 0,
            current_world_id: 1,
            current_difficulty_step: 1,
            game_started_at,
            abandoned_at: None,
            version: 0,
        }
    }

    /// Sets the gameplay counters, e.g. when restoring a session or
    /// recording an answer.
    ///
    /// # Errors
    /// [`TransitionError::AlreadyAbandoned`] if the session is terminal.
    pub fn with_progress(
        mut self,
        current_batch: u32,
        current_question_index: u32,
        correct_answers: u32,
    ) -> Result<Self, TransitionError> {
        self.ensure_active()?;
        self.current_batch = current_batch;
        self.current_question_index = current_question_index;
        self.correct_answers = correct_answers;
        Ok(self)
    }

    /// Sets the difficulty markers.
    ///
    /// # Errors
    /// [`TransitionError::AlreadyAbandoned`] if the session is terminal.
    pub fn with_difficulty(
        mut self,
        current_world_id: u32,
        current_difficulty_step: u32,
    ) -> Result<Self, TransitionError> {
        self.ensure_active()?;
        self.current_world_id = current_world_id;
        self.current_difficulty_step = current_difficulty_step;
        Ok(self)
    }

    /// Returns a copy stamped with a store-assigned version.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    pub fn id(&self) -> InfiniteGameId {
        self.id
    }

    pub fn player_uid(&self) -> &PlayerUid {
        &self.player_uid
    }

    pub fn questions(&self) -> &[InfiniteQuestion] {
        &self.questions
    }

    pub fn current_batch(&self) -> u32 {
        self.current_batch
    }

    pub fn current_question_index(&self) -> u32 {
        self.current_question_index
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn current_world_id(&self) -> u32 {
        self.current_world_id
    }

    pub fn current_difficulty_step(&self) -> u32 {
        self.current_difficulty_step
    }

    pub fn game_started_at(&self) -> OffsetDateTime {
        self.game_started_at
    }

    pub fn abandoned_at(&self) -> Option<OffsetDateTime> {
        self.abandoned_at
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns `true` until the session is abandoned.
    pub fn is_active(&self) -> bool {
        self.abandoned_at.is_none()
    }

    /// Ends the session at `at`. Touches nothing but `abandoned_at`.
    ///
    /// # Errors
    /// [`TransitionError::AlreadyAbandoned`] if the session is already
    /// terminal; the original timestamp is kept.
    pub fn abandon(&mut self, at: OffsetDateTime) -> Result<(), TransitionError> {
        self.ensure_active()?;
        self.abandoned_at = Some(at);
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), TransitionError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(TransitionError::AlreadyAbandoned(self.id))
        }
    }
}
