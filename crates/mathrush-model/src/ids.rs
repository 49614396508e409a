//! Identity newtypes.
//!
//! Each id wraps a primitive so a `GameId` can never be passed where an
//! `InfiniteGameId` is expected, even though both are integers underneath.
//! All of them serialize as the bare inner value (`#[serde(transparent)]`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a player, as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerUid(pub String);

impl PlayerUid {
    /// Creates a uid from anything string-like.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Returns the uid as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ephemeral network identity of a live connection (a socket id).
///
/// A player gets a new one every time they reconnect, so it is never used
/// to look up profiles, only to address a participant inside a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub String);

impl ConnectionId {
    /// Creates a connection id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a multiplayer game.
///
/// Ids are allocated in increasing order by the game store, so ordering by
/// `GameId` is ordering by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// Identifier of a single-player infinite session.
///
/// Signed because callers hand it over from an untyped boundary; anything
/// non-positive is rejected there as an invalid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InfiniteGameId(pub i64);

impl InfiniteGameId {
    /// Returns `true` if the id could have been issued by a store.
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for InfiniteGameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_display_is_prefixed() {
        assert_eq!(GameId(7).to_string(), "G-7");
    }

    #[test]
    fn test_infinite_game_id_display_is_bare_number() {
        // Error messages embed the id as the caller sent it.
        assert_eq!(InfiniteGameId(42).to_string(), "42");
    }

    #[test]
    fn test_infinite_game_id_is_valid_rejects_non_positive() {
        assert!(InfiniteGameId(1).is_valid());
        assert!(!InfiniteGameId(0).is_valid());
        assert!(!InfiniteGameId(-3).is_valid());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&PlayerUid::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
        let json = serde_json::to_string(&GameId(3)).unwrap();
        assert_eq!(json, "3");
    }
}
