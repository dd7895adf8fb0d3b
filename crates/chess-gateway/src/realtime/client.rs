//! A non-owning handle to one accepted socket. The Manager owns the actual
//! per-client state (outbound queue sender, error sink, joined-room set);
//! this handle is cheap to clone and carries just enough identity
//! (`id`/`user_id`/`username`) plus a shared reference back to the Manager
//! that owns it.

use std::sync::Arc;

use chess_core::protocol::event::Event;

use super::manager::Manager;

#[derive(Clone)]
pub struct Client {
    /// Unique per socket, not per user — a user with N tabs has N of these.
    pub id: String,
    pub user_id: String,
    pub username: String,
    manager: Arc<Manager>,
}

impl Client {
    pub fn new(id: String, user_id: String, username: String, manager: Arc<Manager>) -> Self {
        Self { id, user_id, username, manager }
    }

    pub fn manager(&self) -> &Arc<Manager> {
        &self.manager
    }

    /// Enqueues `event` onto this client's outbound queue.
    pub fn push(&self, event: Event) {
        self.manager.push_to_client(&self.id, event);
    }

    pub fn join(&self, room_id: &str) {
        self.manager.join_room_for(&self.id, room_id);
    }

    pub fn leave(&self, room_id: &str) {
        self.manager.leave_room_for(&self.id, room_id);
    }

    /// Leaves every room currently joined; returns the rooms left, in join
    /// order, for the supervisor's disconnect fan-out.
    pub fn leave_all(&self) -> Vec<String> {
        self.manager.leave_all_rooms_for(&self.id)
    }
}
