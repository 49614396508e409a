//! The candidate selection rule, kept free of I/O.
//!
//! The allocator takes a snapshot of the store, narrows it with
//! [`open_candidates`], then drives [`select_first_compatible`] until it
//! settles. The rule asks for one participant rating at a time, in scan
//! order, so the allocator only reads the profiles it needs to decide.
//! Nothing in here can observe or cause a write.

use std::collections::HashMap;

use mathrush_model::{Game, PlayerUid};

/// Returns `true` if a rival rated `rival_points` is within the
/// requester's tolerance.
///
/// Only the requester's band is consulted. A 300-point player (tolerance
/// 50) accepts a 255-point rival even though the rival's own band (40)
/// would not have accepted them. That asymmetry is the established
/// matching behavior. A negative tolerance accepts nobody.
pub fn is_compatible(requester_points: i64, tolerance: i64, rival_points: i64) -> bool {
    let gap = rival_points.abs_diff(requester_points);
    u64::try_from(tolerance).is_ok_and(|tolerance| gap <= tolerance)
}

/// Keeps the games `requester` could join, in snapshot order.
///
/// A candidate is waiting for players, has a free slot, and does not
/// already count the requester among its participants.
pub fn open_candidates(games: Vec<Game>, requester: &PlayerUid) -> Vec<Game> {
    games
        .into_iter()
        .filter(|game| game.has_open_slot() && !game.is_participant(requester))
        .collect()
}

/// Outcome of one pass of [`select_first_compatible`].
#[derive(Debug)]
pub enum Selection<'a> {
    /// Every participant of this game is rated and compatible.
    Chosen(&'a Game),
    /// The scan reached a participant with no known rating. Resolve it,
    /// record it in the ratings, and run the selection again.
    NeedsRating(&'a PlayerUid),
    /// No candidate is compatible.
    NoMatch,
}

/// Picks the first candidate whose every participant is compatible.
///
/// `ratings` maps participant uids to their current points, or `None` when
/// the profile no longer resolves, which disqualifies the game. Scan order
/// is the slice order, so with the store's id ordering the oldest
/// compatible game wins. A game is rejected at its first incompatible
/// participant, and nothing past the chosen game is ever asked for.
pub fn select_first_compatible<'a>(
    candidates: &'a [Game],
    ratings: &HashMap<PlayerUid, Option<i64>>,
    requester_points: i64,
    tolerance: i64,
) -> Selection<'a> {
    'games: for game in candidates {
        for participant in game.players() {
            match ratings.get(&participant.uid) {
                None => return Selection::NeedsRating(&participant.uid),
                Some(Some(points)) if is_compatible(requester_points, tolerance, *points) => {}
                Some(_) => continue 'games,
            }
        }
        return Selection::Chosen(game);
    }
    Selection::NoMatch
}
