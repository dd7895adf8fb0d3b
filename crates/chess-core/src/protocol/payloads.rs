//! Typed payloads for the session wire alphabet.
//!
//! Inbound payloads are deserialized out of [`Event::payload`](super::Event)
//! by handlers; outbound payloads are serialized into it by
//! [`Event::new`](super::Event::new).

use serde::{Deserialize, Serialize};

/// `join_room` (in) — `{room_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRoomPayload {
    pub room_id: String,
}

/// `accept_join_request` (in) — `{room_id, client_id, player_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptJoinRequestPayload {
    pub room_id: String,
    pub client_id: String,
    pub player_id: String,
}

/// `piece_move` (in) — `{room_id, fen, move}`. Relayed and persisted as-is;
/// the server never validates `fen` or `move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceMovePayload {
    pub room_id: String,
    pub fen: String,
    #[serde(rename = "move")]
    pub mv: serde_json::Value,
}

/// `close_room` (in) — `{room_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseRoomPayload {
    pub room_id: String,
}

/// `request_join` (out) — `{id, client_id, username}`.
#[derive(Debug, Clone, Serialize)]
pub struct RequestJoinPayload {
    pub id: String,
    pub client_id: String,
    pub username: String,
}

/// `user_connect` / `user_disconnect` (out) — `{user_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UserConnPayload {
    pub user_id: String,
}

/// `closing_room` (out) — `{room_id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ClosingRoomPayload {
    pub room_id: String,
}

/// Event type string constants (the full wire alphabet).
pub mod event_type {
    pub const JOIN_ROOM: &str = "join_room";
    pub const ACCEPT_JOIN_REQUEST: &str = "accept_join_request";
    pub const PIECE_MOVE: &str = "piece_move";
    pub const CLOSE_ROOM: &str = "close_room";

    pub const JOINED_ROOM: &str = "joined_room";
    pub const REQUEST_JOIN: &str = "request_join";
    pub const START_GAME: &str = "start_game";
    pub const USER_CONNECT: &str = "user_connect";
    pub const USER_DISCONNECT: &str = "user_disconnect";
    pub const CONN_ELSEWHERE: &str = "conn_elsewhere";
    pub const ROOM_NOT_FOUND: &str = "room_not_found";
    pub const ROOM_FULL: &str = "room_full";
    pub const CLOSING_ROOM: &str = "closing_room";
}
