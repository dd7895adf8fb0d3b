//! Redis-backed `RoomStore`, over the `redis` crate's async,
//! auto-reconnecting `ConnectionManager`.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use chess_core::error::{ChessError, Result};

use super::RoomStore;

pub struct RedisRoomStore {
    conn: ConnectionManager,
}

impl RedisRoomStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(|e| ChessError::Store(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client).await.map_err(|e| ChessError::Store(format!("redis connect failed: {e}")))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl RoomStore for RedisRoomStore {
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(key, field, value).await.map_err(store_err)
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        let mut conn = self.conn.clone();
        conn.hgetall(key).await.map_err(store_err)
    }

    async fn del(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(store_err)
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.expire::<_, ()>(key, ttl_secs as i64).await.map_err(store_err)
    }
}

fn store_err(e: redis::RedisError) -> ChessError {
    ChessError::Store(e.to_string())
}
