#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

//! Scenario and invariant tests driving the `Manager` directly against an
//! in-memory store, with fake client handles standing in for real sockets.

use std::sync::Arc;

use tokio::sync::mpsc;

use chess_core::protocol::event::Event;
use chess_core::protocol::payloads::{
    event_type, AcceptJoinRequestPayload, CloseRoomPayload, JoinRoomPayload, PieceMovePayload,
};
use chess_gateway::obs::metrics::GatewayMetrics;
use chess_gateway::realtime::{Client, Manager};
use chess_gateway::store::{InMemoryRoomStore, RoomRepository};

fn new_manager() -> Arc<Manager> {
    let repo = Arc::new(RoomRepository::new(Arc::new(InMemoryRoomStore::new())));
    Arc::new(Manager::new(repo, Arc::new(GatewayMetrics::new())))
}

/// Registers a client with the manager and returns its handle plus the
/// receiving end of its outbound queue.
fn spawn(manager: &Arc<Manager>, client_id: &str, user_id: &str, username: &str) -> (Client, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(32);
    let (err_tx, _err_rx) = mpsc::channel(4);
    manager.add_client(client_id, user_id, username, tx, err_tx);
    let client = Client::new(client_id.to_string(), user_id.to_string(), username.to_string(), manager.clone());
    client.join(user_id);
    (client, rx)
}

#[tokio::test]
async fn s1_two_player_session_start() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();

    let (a, mut a_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("R");

    let (b, mut b_rx) = spawn(&manager, "b-sock", "U_B", "bob");
    let join = Event::new(event_type::JOIN_ROOM, JoinRoomPayload { room_id: "R".into() }).unwrap();
    manager.route_event(&b, join).await.unwrap();

    let request = a_rx.try_recv().expect("A receives request_join");
    assert_eq!(request.event_type, event_type::REQUEST_JOIN);
    assert_eq!(request.payload["id"], "U_B");
    assert_eq!(request.payload["client_id"], "b-sock");
    assert_eq!(request.payload["username"], "bob");

    let accept = Event::new(
        event_type::ACCEPT_JOIN_REQUEST,
        AcceptJoinRequestPayload { room_id: "R".into(), client_id: "b-sock".into(), player_id: "U_B".into() },
    )
    .unwrap();
    manager.route_event(&a, accept).await.unwrap();

    let start_a = a_rx.try_recv().expect("A receives start_game");
    let start_b = b_rx.try_recv().expect("B receives start_game");
    for start in [&start_a, &start_b] {
        assert_eq!(start.event_type, event_type::START_GAME);
        assert_eq!(start.payload["player2"], "U_B");
        assert_eq!(start.payload["player2_username"], "bob");
        assert_eq!(start.payload["active"], "yes");
    }

    let record = manager.store().get("R").await.unwrap().expect("record");
    assert_eq!(record.player2, "U_B");
    assert!(record.is_active());
}

#[tokio::test]
async fn s2_second_tab_of_same_user() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();

    let (a, mut a_rx) = spawn(&manager, "a-sock-1", "U_A", "alice");
    a.join("R");

    let (a2, mut a2_rx) = spawn(&manager, "a-sock-2", "U_A", "alice");
    let join = Event::new(event_type::JOIN_ROOM, JoinRoomPayload { room_id: "R".into() }).unwrap();
    manager.route_event(&a2, join).await.unwrap();

    let displaced = a_rx.try_recv().expect("first tab sees conn_elsewhere");
    assert_eq!(displaced.event_type, event_type::CONN_ELSEWHERE);
    assert_eq!(displaced.payload, "R");

    let joined = a2_rx.try_recv().expect("second tab sees joined_room");
    assert_eq!(joined.event_type, event_type::JOINED_ROOM);

    // user_connect fans out to the room, reaching every member including the
    // tab that just joined.
    let connect = a2_rx.try_recv().expect("user_connect reaches the new tab too");
    assert_eq!(connect.event_type, event_type::USER_CONNECT);
    assert_eq!(connect.payload["user_id"], "U_A");
}

#[tokio::test]
async fn s3_non_member_tries_to_join_full_room() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();
    manager.store().set_field("R", chess_core::protocol::room::field::PLAYER2, "U_B").await.unwrap();
    manager.store().set_field("R", chess_core::protocol::room::field::ACTIVE, "yes").await.unwrap();

    let (_a, _a_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    let (c, mut c_rx) = spawn(&manager, "c-sock", "U_C", "carol");

    let join = Event::new(event_type::JOIN_ROOM, JoinRoomPayload { room_id: "R".into() }).unwrap();
    manager.route_event(&c, join).await.unwrap();

    let reply = c_rx.try_recv().expect("U_C receives a reply");
    assert_eq!(reply.event_type, event_type::ROOM_FULL);
    assert!(reply.payload.is_null());

    let record = manager.store().get("R").await.unwrap().expect("record unchanged");
    assert_eq!(record.player1, "U_A");
    assert_eq!(record.player2, "U_B");
}

#[tokio::test]
async fn s4_move_relay_and_persistence() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();
    manager.store().set_field("R", chess_core::protocol::room::field::PLAYER2, "U_B").await.unwrap();

    let (a, mut a_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("R");
    let (_b, mut b_rx) = spawn(&manager, "b-sock", "U_B", "bob");
    manager.join_room_for("b-sock", "R");

    let mv = Event::new(
        event_type::PIECE_MOVE,
        PieceMovePayload { room_id: "R".into(), fen: "new-fen".into(), mv: serde_json::json!({"from": "e2", "to": "e4"}) },
    )
    .unwrap();
    manager.route_event(&a, mv).await.unwrap();

    let a_seen = a_rx.try_recv().expect("sender also receives the relay");
    let b_seen = b_rx.try_recv().expect("opponent receives the relay");
    assert_eq!(a_seen.event_type, event_type::PIECE_MOVE);
    assert_eq!(b_seen.event_type, event_type::PIECE_MOVE);
    assert_eq!(a_seen.payload["fen"], "new-fen");

    let record = manager.store().get("R").await.unwrap().expect("record");
    assert_eq!(record.game_state, "new-fen");
}

#[tokio::test]
async fn s5_disconnect_broadcast_on_last_client() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();

    let (a, _a_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("R");
    let (_b, mut b_rx) = spawn(&manager, "b-sock", "U_B", "bob");
    manager.join_room_for("b-sock", "R");

    // Mirrors the supervisor's teardown sequence: check last-client status
    // before leaving, then fan out user_disconnect to the rooms left.
    let was_last = manager.is_last_client_of_user("U_A", "a-sock");
    assert!(was_last);
    let left_rooms = a.leave_all();
    for room_id in &left_rooms {
        manager.emit_user_disconnect("U_A", room_id);
    }
    manager.remove_client("a-sock");

    let disconnect = b_rx.try_recv().expect("B receives user_disconnect");
    assert_eq!(disconnect.event_type, event_type::USER_DISCONNECT);
    assert_eq!(disconnect.payload["user_id"], "U_A");

    assert!(manager.members_of("R").iter().all(|(_, uid)| uid != "U_A"));
    let record = manager.store().get("R").await.unwrap().expect("store untouched by disconnect");
    assert_eq!(record.player1, "U_A");
}

#[tokio::test]
async fn s6_close_room() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();

    let (a, mut a_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("R");
    let (_b, mut b_rx) = spawn(&manager, "b-sock", "U_B", "bob");
    manager.join_room_for("b-sock", "R");

    let close = Event::new(event_type::CLOSE_ROOM, CloseRoomPayload { room_id: "R".into() }).unwrap();
    manager.route_event(&a, close).await.unwrap();

    assert_eq!(a_rx.try_recv().expect("A notified").event_type, event_type::CLOSING_ROOM);
    assert_eq!(b_rx.try_recv().expect("B notified").event_type, event_type::CLOSING_ROOM);

    assert!(manager.store().get("R").await.unwrap().is_none());
    assert!(manager.room_is_empty_or_absent("R"));
}

#[tokio::test]
async fn invariant_reciprocal_membership_holds_after_join_and_leave() {
    let manager = new_manager();
    let (a, _rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("room-1");
    assert!(manager.members_of("room-1").iter().any(|(cid, _)| cid == "a-sock"));

    a.leave("room-1");
    assert!(manager.members_of("room-1").is_empty());
    assert!(manager.room_is_empty_or_absent("room-1"));
}

#[tokio::test]
async fn invariant_room_removed_from_registry_once_empty() {
    let manager = new_manager();
    let (a, _rx) = spawn(&manager, "a-sock", "U_A", "alice");
    a.join("room-1");
    a.leave("room-1");
    assert!(manager.room_is_empty_or_absent("room-1"));
}

#[tokio::test]
async fn invariant_active_implies_seated_opponent() {
    let manager = new_manager();
    manager.store().create("R", "U_A", "alice").await.unwrap();
    let (creator, _creator_rx) = spawn(&manager, "a-sock", "U_A", "alice");
    let (joiner, _joiner_rx) = spawn(&manager, "b-sock", "U_B", "bob");

    let accept = Event::new(
        event_type::ACCEPT_JOIN_REQUEST,
        AcceptJoinRequestPayload { room_id: "R".into(), client_id: "b-sock".into(), player_id: "U_B".into() },
    )
    .unwrap();
    manager.route_event(&creator, accept).await.unwrap();
    let _ = &joiner;

    let record = manager.store().get("R").await.unwrap().expect("record");
    assert!(record.is_active());
    assert!(!record.player2.is_empty());
    assert!(!record.player2_username.is_empty());
}
