//! The process-wide coordinator: the client table, the room registry, the
//! handler table, and the durable store handle. Owns a single exclusive
//! lock guarding `clients`, `rooms`, and every client's `joined_rooms`
//! together, so membership changes never observe a half-updated state.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use indexmap::IndexSet;
use tokio::sync::mpsc;

use chess_core::error::{ChessError, Result};
use chess_core::protocol::event::Event;
use chess_core::protocol::payloads::event_type;

use crate::obs::metrics::GatewayMetrics;
use crate::store::RoomRepository;

use super::client::Client;
use super::handlers;

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
type HandlerFn = for<'a> fn(&'a Manager, &'a Client, Event) -> HandlerFuture<'a>;

/// Per-client bookkeeping the Manager owns. The `Client` handle handed to
/// code elsewhere is a non-owning reference by id; this struct is the thing
/// it refers to.
struct ClientEntry {
    user_id: String,
    username: String,
    tx: mpsc::Sender<Event>,
    err_tx: mpsc::Sender<ChessError>,
    joined_rooms: IndexSet<String>,
}

#[derive(Default)]
struct ManagerState {
    clients: HashMap<String, ClientEntry>,
    /// room_id -> ordered set of client ids. Identity rooms (room_id ==
    /// user_id) live in this same map, not a separate table.
    rooms: HashMap<String, IndexSet<String>>,
}

pub struct Manager {
    state: Mutex<ManagerState>,
    store: Arc<RoomRepository>,
    metrics: Arc<GatewayMetrics>,
    handlers: HashMap<&'static str, HandlerFn>,
}

impl Manager {
    pub fn new(store: Arc<RoomRepository>, metrics: Arc<GatewayMetrics>) -> Self {
        Self { state: Mutex::new(ManagerState::default()), store, metrics, handlers: build_handlers() }
    }

    pub fn store(&self) -> &RoomRepository {
        &self.store
    }

    pub fn metrics(&self) -> &GatewayMetrics {
        &self.metrics
    }

    /// Registers a freshly upgraded socket's client entry. Does not join any
    /// room — the caller joins the identity room as a separate step.
    pub fn add_client(
        &self,
        client_id: &str,
        user_id: &str,
        username: &str,
        tx: mpsc::Sender<Event>,
        err_tx: mpsc::Sender<ChessError>,
    ) {
        let mut state = lock(&self.state);
        state.clients.insert(
            client_id.to_string(),
            ClientEntry {
                user_id: user_id.to_string(),
                username: username.to_string(),
                tx,
                err_tx,
                joined_rooms: IndexSet::new(),
            },
        );
        drop(state);
        self.metrics.sessions_active.inc(&[]);
    }

    /// Dictionary deletion only — callers must `leave_all_rooms_for` first if
    /// the reciprocal-membership invariant is to hold throughout teardown.
    pub fn remove_client(&self, client_id: &str) {
        let mut state = lock(&self.state);
        let existed = state.clients.remove(client_id).is_some();
        drop(state);
        if existed {
            self.metrics.sessions_active.dec(&[]);
        }
    }

    /// Join(room_id): ensure room exists, append client if absent, add
    /// room to the client's `joined_rooms` if absent. Atomic under one lock.
    pub fn join_room_for(&self, client_id: &str, room_id: &str) {
        let mut state = lock(&self.state);
        let is_new_room = !state.rooms.contains_key(room_id);
        state.rooms.entry(room_id.to_string()).or_default().insert(client_id.to_string());
        if let Some(entry) = state.clients.get_mut(client_id) {
            entry.joined_rooms.insert(room_id.to_string());
        }
        drop(state);
        if is_new_room {
            self.metrics.rooms_active.inc(&[]);
        }
    }

    /// Leave(room_id): order-preserving removal from the room, removal
    /// of the room_id from `joined_rooms`, and registry cleanup if the room
    /// is now empty.
    pub fn leave_room_for(&self, client_id: &str, room_id: &str) {
        let mut state = lock(&self.state);
        let removed = leave_locked(&mut state, client_id, room_id);
        drop(state);
        if removed {
            self.metrics.rooms_active.dec(&[]);
        }
    }

    /// `LeaveAllRooms`: leaves every room the client currently occupies and
    /// returns the list left, in join order, for the supervisor's
    /// `user_disconnect` fan-out.
    pub fn leave_all_rooms_for(&self, client_id: &str) -> Vec<String> {
        let mut state = lock(&self.state);
        let rooms: Vec<String> =
            state.clients.get(client_id).map(|c| c.joined_rooms.iter().cloned().collect()).unwrap_or_default();
        let mut removed_count: i64 = 0;
        for room_id in &rooms {
            if leave_locked(&mut state, client_id, room_id) {
                removed_count += 1;
            }
        }
        drop(state);
        if removed_count > 0 {
            self.metrics.rooms_active.add(&[], -removed_count);
        }
        rooms
    }

    /// True iff `client_id` is the only member left of `user_id`'s identity
    /// room (room_id == user_id) — i.e. tearing this client down leaves the
    /// user with no connected socket at all.
    pub fn is_last_client_of_user(&self, user_id: &str, client_id: &str) -> bool {
        let state = lock(&self.state);
        match state.rooms.get(user_id) {
            Some(members) => members.len() <= 1 && (members.is_empty() || members.contains(client_id)),
            None => true,
        }
    }

    /// True if the room has no members, including if it doesn't exist.
    pub fn room_is_empty_or_absent(&self, room_id: &str) -> bool {
        let state = lock(&self.state);
        state.rooms.get(room_id).map(|m| m.is_empty()).unwrap_or(true)
    }

    /// Snapshot of `(client_id, user_id)` pairs currently in a room, in
    /// membership order.
    pub fn members_of(&self, room_id: &str) -> Vec<(String, String)> {
        let state = lock(&self.state);
        match state.rooms.get(room_id) {
            Some(members) => members
                .iter()
                .filter_map(|cid| state.clients.get(cid).map(|c| (cid.clone(), c.user_id.clone())))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Looks up a client's `username` by id, for `accept_join_request`,
    /// which needs the username of the socket it's about to seat.
    pub fn username_of(&self, client_id: &str) -> Option<String> {
        let state = lock(&self.state);
        state.clients.get(client_id).map(|c| c.username.clone())
    }

    /// Dictionary deletion of the whole room, plus cleanup of the
    /// `joined_rooms` side of the invariant for every member it held.
    pub fn leave_room_registry(&self, room_id: &str) {
        let mut state = lock(&self.state);
        let existed = state.rooms.remove(room_id).map(|members| {
            for client_id in members {
                if let Some(entry) = state.clients.get_mut(&client_id) {
                    entry.joined_rooms.shift_remove(room_id);
                }
            }
        });
        drop(state);
        if existed.is_some() {
            self.metrics.rooms_active.dec(&[]);
        }
    }

    pub fn client_exists(&self, client_id: &str) -> bool {
        let state = lock(&self.state);
        state.clients.contains_key(client_id)
    }

    /// Enqueues `event` onto one client's outbound queue. A full bounded
    /// queue is a slow-consumer failure and is surfaced to that client's
    /// supervisor, never silently dropped.
    pub fn push_to_client(&self, client_id: &str, event: Event) {
        let target = {
            let state = lock(&self.state);
            state.clients.get(client_id).map(|c| (c.tx.clone(), c.err_tx.clone()))
        };
        if let Some((tx, err_tx)) = target {
            push_or_fail(&tx, &err_tx, event, &self.metrics);
        }
    }

    /// `emit_to_room`: snapshots the member list under the lock,
    /// then pushes outside of it so a slow consumer never holds up the lock.
    pub fn emit_to_room(&self, room_id: &str, event: Event) {
        let targets: Vec<(mpsc::Sender<Event>, mpsc::Sender<ChessError>)> = {
            let state = lock(&self.state);
            match state.rooms.get(room_id) {
                Some(members) => members
                    .iter()
                    .filter_map(|cid| state.clients.get(cid).map(|c| (c.tx.clone(), c.err_tx.clone())))
                    .collect(),
                None => return,
            }
        };
        for (tx, err_tx) in targets {
            push_or_fail(&tx, &err_tx, event.clone(), &self.metrics);
        }
    }

    /// `emit_user_disconnect`: helper wrapping the one-room fan-out for
    /// a `user_disconnect` event.
    pub fn emit_user_disconnect(&self, user_id: &str, room_id: &str) {
        if let Ok(event) = Event::new(event_type::USER_DISCONNECT, chess_core::protocol::payloads::UserConnPayload {
            user_id: user_id.to_string(),
        }) {
            self.emit_to_room(room_id, event);
        }
    }

    /// Looks up the handler bound to `event.type` and runs it. Unknown types
    /// surface as a `BadRequest`, which `route_event`'s caller turns into an
    /// `error_<trace>` event — never fatal to the connection.
    pub async fn route_event(&self, client: &Client, event: Event) -> Result<()> {
        self.metrics.events_total.inc(&[("type", event.event_type.as_str())]);
        match self.handlers.get(event.event_type.as_str()) {
            Some(handler) => handler(self, client, event).await,
            None => Err(ChessError::BadRequest("there is no such event type".into())),
        }
    }
}

fn lock(state: &Mutex<ManagerState>) -> std::sync::MutexGuard<'_, ManagerState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Returns true if this removed the room from the registry entirely.
fn leave_locked(state: &mut ManagerState, client_id: &str, room_id: &str) -> bool {
    let mut room_removed = false;
    if let Some(members) = state.rooms.get_mut(room_id) {
        members.shift_remove(client_id);
        if members.is_empty() {
            state.rooms.remove(room_id);
            room_removed = true;
        }
    }
    if let Some(entry) = state.clients.get_mut(client_id) {
        entry.joined_rooms.shift_remove(room_id);
    }
    room_removed
}

fn push_or_fail(tx: &mpsc::Sender<Event>, err_tx: &mpsc::Sender<ChessError>, event: Event, metrics: &GatewayMetrics) {
    if tx.try_send(event).is_err() {
        metrics.egress_drops_total.inc(&[]);
        let _ = err_tx.try_send(ChessError::Transport("outbound queue full".into()));
    }
}

fn build_handlers() -> HashMap<&'static str, HandlerFn> {
    let mut m: HashMap<&'static str, HandlerFn> = HashMap::new();
    m.insert(event_type::JOIN_ROOM, |mgr, c, e| Box::pin(handlers::join_room(mgr, c, e)));
    m.insert(event_type::ACCEPT_JOIN_REQUEST, |mgr, c, e| Box::pin(handlers::accept_join_request(mgr, c, e)));
    m.insert(event_type::PIECE_MOVE, |mgr, c, e| Box::pin(handlers::piece_move(mgr, c, e)));
    m.insert(event_type::CLOSE_ROOM, |mgr, c, e| Box::pin(handlers::close_room(mgr, c, e)));
    m
}
