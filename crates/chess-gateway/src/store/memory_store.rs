//! In-memory `RoomStore`, backing tests without a live Redis. No real TTL —
//! tests don't exercise 12h expiry, `expire` is recorded but never acted on.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use chess_core::error::Result;

use super::RoomStore;

#[derive(Default)]
pub struct InMemoryRoomStore {
    hashes: DashMap<String, HashMap<String, String>>,
}

impl InMemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomStore for InMemoryRoomStore {
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.hashes.entry(key.to_string()).or_default().insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        Ok(self.hashes.get(key).map(|h| h.clone()).unwrap_or_default())
    }

    async fn del(&self, key: &str) -> Result<()> {
        self.hashes.remove(key);
        Ok(())
    }

    async fn expire(&self, _key: &str, _ttl_secs: u64) -> Result<()> {
        Ok(())
    }
}
