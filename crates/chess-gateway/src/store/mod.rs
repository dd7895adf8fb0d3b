//! Durable room storage: a hash-map-per-key service with HSET/HGETALL/DEL/
//! EXPIRE semantics. `RoomStore` is the thin trait over that shape;
//! `RedisRoomStore` backs it with the `redis` crate; `InMemoryRoomStore`
//! backs it with `dashmap` for tests.

mod memory_store;
mod redis_store;

pub use memory_store::InMemoryRoomStore;
pub use redis_store::RedisRoomStore;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use chess_core::error::Result;
use chess_core::protocol::room::RoomRecord;

/// Seconds in 12 hours — the durable record's TTL from creation.
pub const ROOM_TTL_SECS: u64 = 12 * 60 * 60;

#[async_trait]
pub trait RoomStore: Send + Sync {
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;
    async fn del(&self, key: &str) -> Result<()>;
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<()>;
}

fn room_key(room_id: &str) -> String {
    format!("room:{room_id}")
}

/// Typed operations over a `RoomStore`, scoped to the `room:<id>` key shape.
/// Handlers call this, never the raw `RoomStore` trait.
pub struct RoomRepository {
    store: Arc<dyn RoomStore>,
}

impl RoomRepository {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }

    /// Creates a fresh room record (one seated player, default FEN, inactive)
    /// and sets its 12h TTL. Mirrors `api/services.go::CreateRoom`.
    pub async fn create(&self, room_id: &str, player1: &str, player1_username: &str) -> Result<RoomRecord> {
        let record = RoomRecord::new(room_id, player1, player1_username);
        let key = room_key(room_id);
        for (field, value) in record.to_fields() {
            self.store.hset(&key, field, &value).await?;
        }
        self.store.expire(&key, ROOM_TTL_SECS).await?;
        Ok(record)
    }

    /// `None` means the key does not exist (an empty `HGETALL` reply).
    pub async fn get(&self, room_id: &str) -> Result<Option<RoomRecord>> {
        let fields = self.store.hgetall(&room_key(room_id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(RoomRecord::from_fields(fields)?))
    }

    pub async fn set_field(&self, room_id: &str, field: &str, value: &str) -> Result<()> {
        self.store.hset(&room_key(room_id), field, value).await
    }

    pub async fn delete(&self, room_id: &str) -> Result<()> {
        self.store.del(&room_key(room_id)).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let repo = RoomRepository::new(Arc::new(InMemoryRoomStore::new()));
        let created = repo.create("r1", "u1", "alice").await.expect("create");
        let fetched = repo.get("r1").await.expect("get").expect("present");
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn get_missing_room_is_none() {
        let repo = RoomRepository::new(Arc::new(InMemoryRoomStore::new()));
        assert!(repo.get("missing").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let repo = RoomRepository::new(Arc::new(InMemoryRoomStore::new()));
        repo.create("r1", "u1", "alice").await.expect("create");
        repo.delete("r1").await.expect("delete");
        assert!(repo.get("r1").await.expect("get").is_none());
    }

    #[tokio::test]
    async fn set_field_updates_single_column() {
        let repo = RoomRepository::new(Arc::new(InMemoryRoomStore::new()));
        repo.create("r1", "u1", "alice").await.expect("create");
        repo.set_field("r1", "active", "yes").await.expect("set_field");
        let fetched = repo.get("r1").await.expect("get").expect("present");
        assert_eq!(fetched.active, "yes");
    }
}
