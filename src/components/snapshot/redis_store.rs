use super::{decode_snapshot, encode_snapshot};
use crate::components::SnapshotStore;
use crate::digest::Event;
use crate::error::{snapshot_error, BotResult, Error};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client as RedisClient};
use tracing::info;

// Redis key constants
pub mod keys {
    pub const LAST_EVENTS: &str = "lichbot:last_events";
}

/// Snapshot kept as a JSON string in Redis
#[derive(Clone)]
pub struct RedisSnapshotStore {
    client: RedisClient,
    key: String,
}

impl RedisSnapshotStore {
    /// Create a store for a Redis URL; no connection is made yet
    pub fn new(redis_url: &str) -> BotResult<Self> {
        let client = RedisClient::open(redis_url)
            .map_err(|e| snapshot_error(&format!("Failed to create Redis client: {}", e)))?;
        Ok(Self {
            client,
            key: keys::LAST_EVENTS.to_string(),
        })
    }

    /// Use a different key than the default
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    async fn connection(&self) -> BotResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| snapshot_error(&format!("Failed to connect to Redis: {}", e)))
    }
}

#[async_trait]
impl SnapshotStore for RedisSnapshotStore {
    async fn load_snapshot(&self) -> BotResult<Vec<Event>> {
        let mut conn = self.connection().await?;

        let exists: bool = conn
            .exists(&self.key)
            .await
            .map_err(|e| -> Error { snapshot_error(&format!("Redis error: {}", e)) })?;

        if !exists {
            info!("No snapshot under Redis key {}, starting fresh", self.key);
            return Ok(Vec::new());
        }

        let json: String = conn
            .get(&self.key)
            .await
            .map_err(|e| -> Error { snapshot_error(&format!("Failed to read snapshot from Redis: {}", e)) })?;

        decode_snapshot(&json)
    }

    async fn save_snapshot(&self, events: &[Event]) -> BotResult<()> {
        let json = encode_snapshot(events)?;
        let mut conn = self.connection().await?;

        () = conn
            .set(&self.key, json)
            .await
            .map_err(|e| -> Error { snapshot_error(&format!("Failed to save snapshot to Redis: {}", e)) })?;

        info!("Saved {} events to Redis key {}", events.len(), self.key);
        Ok(())
    }
}
