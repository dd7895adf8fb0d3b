//! The durable room record kept in the external key-value store
//! under key `room:<id>`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ChessError, Result};

pub const DEFAULT_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Hash field names used against the store (`HSET room:<id> <field> <value>`).
pub mod field {
    pub const ID: &str = "id";
    pub const PLAYER1: &str = "player1";
    pub const PLAYER2: &str = "player2";
    pub const PLAYER1_USERNAME: &str = "player1_username";
    pub const PLAYER2_USERNAME: &str = "player2_username";
    pub const GAME_STATE: &str = "game_state";
    pub const ACTIVE: &str = "active";
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomRecord {
    pub id: String,
    pub player1: String,
    pub player2: String,
    pub player1_username: String,
    pub player2_username: String,
    pub game_state: String,
    pub active: String,
}

impl RoomRecord {
    /// A freshly created room: one seated player, no opponent, default
    /// starting position, inactive.
    pub fn new(id: impl Into<String>, player1: impl Into<String>, player1_username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            player1: player1.into(),
            player2: String::new(),
            player1_username: player1_username.into(),
            player2_username: String::new(),
            game_state: DEFAULT_FEN.to_string(),
            active: "no".to_string(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active == "yes"
    }

    pub fn opponent_of(&self, user_id: &str) -> Option<&str> {
        if self.player1 == user_id {
            Some(&self.player2)
        } else if self.player2 == user_id {
            Some(&self.player1)
        } else {
            None
        }
    }

    pub fn is_seated(&self, user_id: &str) -> bool {
        self.player1 == user_id || self.player2 == user_id
    }

    /// Flatten into the field/value pairs a `HSET` would store.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (field::ID, self.id.clone()),
            (field::PLAYER1, self.player1.clone()),
            (field::PLAYER2, self.player2.clone()),
            (field::PLAYER1_USERNAME, self.player1_username.clone()),
            (field::PLAYER2_USERNAME, self.player2_username.clone()),
            (field::GAME_STATE, self.game_state.clone()),
            (field::ACTIVE, self.active.clone()),
        ]
    }

    /// Reconstruct from the result of a `HGETALL`. An empty map means the key
    /// does not exist (Redis's `HGETALL` on a missing key returns an empty
    /// reply rather than an error).
    pub fn from_fields(mut fields: HashMap<String, String>) -> Result<Self> {
        let mut take = |key: &str| fields.remove(key).unwrap_or_default();
        let id = take(field::ID);
        if id.is_empty() {
            return Err(ChessError::NotFound("room record missing id field".into()));
        }
        Ok(Self {
            id,
            player1: take(field::PLAYER1),
            player2: take(field::PLAYER2),
            player1_username: take(field::PLAYER1_USERNAME),
            player2_username: take(field::PLAYER2_USERNAME),
            game_state: take(field::GAME_STATE),
            active: take(field::ACTIVE),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn new_room_is_inactive_with_default_fen() {
        let r = RoomRecord::new("r1", "u1", "alice");
        assert!(!r.is_active());
        assert_eq!(r.game_state, DEFAULT_FEN);
        assert_eq!(r.player2, "");
    }

    #[test]
    fn field_round_trip() {
        let r = RoomRecord::new("r1", "u1", "alice");
        let fields: HashMap<String, String> =
            r.to_fields().into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        let back = RoomRecord::from_fields(fields).expect("from_fields");
        assert_eq!(back, r);
    }

    #[test]
    fn opponent_of_resolves_either_seat() {
        let mut r = RoomRecord::new("r1", "u1", "alice");
        r.player2 = "u2".to_string();
        assert_eq!(r.opponent_of("u1"), Some("u2"));
        assert_eq!(r.opponent_of("u2"), Some("u1"));
        assert_eq!(r.opponent_of("u3"), None);
    }
}
