//! Value types: profiles, participants, power-ups, and questions.
//!
//! None of these carry invariants of their own; they are plain data
//! owned by a collaborator (directory, catalog, question supply) and
//! copied into aggregates.

use serde::{Deserialize, Serialize};

use crate::{ConnectionId, PlayerUid};

// ---------------------------------------------------------------------------
// Profiles and participants
// ---------------------------------------------------------------------------

/// A player's persistent profile, as held by the player directory.
///
/// `points` is the skill rating matchmaking compares. It only moves between
/// matches, so a profile read at the start of a matchmaking decision stays
/// valid for the rest of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub uid: PlayerUid,
    pub name: String,
    pub points: i64,
    /// Soft currency spent in the garage.
    #[serde(default)]
    pub coins: i64,
    #[serde(default)]
    pub level: u32,
}

impl PlayerProfile {
    /// Creates a profile with no currency or progress.
    pub fn new(uid: impl Into<String>, name: impl Into<String>, points: i64) -> Self {
        Self {
            uid: PlayerUid::new(uid),
            name: name.into(),
            points,
            coins: 0,
            level: 0,
        }
    }
}

/// A live participant of a game.
///
/// Bound to the connection that requested the match. `points` is the
/// rating snapshot taken when the player was admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub connection_id: ConnectionId,
    pub uid: PlayerUid,
    pub name: String,
    pub points: i64,
    pub power_ups: Vec<PowerUp>,
}

impl Player {
    /// Creates a participant for `profile` on the given connection.
    pub fn new(connection_id: ConnectionId, profile: &PlayerProfile) -> Self {
        Self {
            connection_id,
            uid: profile.uid.clone(),
            name: profile.name.clone(),
            points: profile.points,
            power_ups: Vec::new(),
        }
    }

    /// Attaches a starting grant.
    pub fn with_power_ups(mut self, power_ups: Vec<PowerUp>) -> Self {
        self.power_ups = power_ups;
        self
    }
}

// ---------------------------------------------------------------------------
// Power-ups
// ---------------------------------------------------------------------------

/// The kinds of power-up in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PowerUpKind {
    DoublePoints,
    ExtraTime,
    SkipQuestion,
    FiftyFifty,
    Shield,
}

impl PowerUpKind {
    /// Every kind, in catalog order.
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::DoublePoints,
        PowerUpKind::ExtraTime,
        PowerUpKind::SkipQuestion,
        PowerUpKind::FiftyFifty,
        PowerUpKind::Shield,
    ];
}

/// A catalog entry. Grants hand out copies; the catalog itself never
/// changes at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub name: String,
    pub description: String,
}

impl PowerUp {
    /// Returns the catalog entry for `kind`.
    pub fn from_kind(kind: PowerUpKind) -> Self {
        let (name, description) = match kind {
            PowerUpKind::DoublePoints => {
                ("Double Points", "The next correct answer scores twice.")
            }
            PowerUpKind::ExtraTime => ("Extra Time", "Adds five seconds to the current question."),
            PowerUpKind::SkipQuestion => {
                ("Skip", "Skips the current question without penalty.")
            }
            PowerUpKind::FiftyFifty => ("50/50", "Removes half of the wrong options."),
            PowerUpKind::Shield => ("Shield", "Blocks the next wrong-answer penalty."),
        };
        Self {
            kind,
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Questions
// ---------------------------------------------------------------------------

/// A multiplayer question: pick the right option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub equation: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

/// Expected outcome of an infinite-mode comparison question.
///
/// Serialized with the wire names clients already use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = "MAYOR")]
    Greater,
    #[serde(rename = "MENOR")]
    Lesser,
}

/// An infinite-mode question. Generated once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfiniteQuestion {
    pub equation: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub expected: Comparison,
}
