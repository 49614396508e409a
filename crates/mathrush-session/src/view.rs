//! Read-only projection of an infinite session.

use mathrush_model::{InfiniteGame, InfiniteGameId, PlayerUid};
use serde::Serialize;
use time::OffsetDateTime;

/// What callers get back from status and abandon requests.
///
/// Counters and markers are copied verbatim; `is_active` is derived from
/// `abandoned_at`. Question content is summarized as a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfiniteGameView {
    pub id: InfiniteGameId,
    pub player_uid: PlayerUid,
    pub current_batch: u32,
    pub current_question_index: u32,
    pub correct_answers: u32,
    pub current_world_id: u32,
    pub current_difficulty_step: u32,
    pub total_questions: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub game_started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub abandoned_at: Option<OffsetDateTime>,
    pub is_active: bool,
}

impl From<&InfiniteGame> for InfiniteGameView {
    fn from(game: &InfiniteGame) -> Self {
        Self {
            id: game.id(),
            player_uid: game.player_uid().clone(),
            current_batch: game.current_batch(),
            current_question_index: game.current_question_index(),
            correct_answers: game.correct_answers(),
            current_world_id: game.current_world_id(),
            current_difficulty_step: game.current_difficulty_step(),
            total_questions: game.questions().len(),
            game_started_at: game.game_started_at(),
            abandoned_at: game.abandoned_at(),
            is_active: game.is_active(),
        }
    }
}
