//! Key-value store adapter over Redis.
//!
//! The rest of the service talks to the store only through [`KeyValueStore`],
//! so tests run against [`MockStore`] without a Redis instance.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use service_core::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, auto-expiring after `ttl_seconds`.
    /// Overwrites any existing value and resets its expiry.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl_seconds: i64)
        -> Result<(), AppError>;

    /// `None` for a missing key, never an error.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Idempotent; deleting a non-existent key is not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), AppError>;

    /// Best-effort bulk delete of every key matching `prefix*`, except those
    /// listed in `exclude`. Returns the number of keys deleted.
    async fn delete_by_prefix(&self, prefix: &str, exclude: &[String]) -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct RedisStore {
    _client: Client,
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect and ping. Callers treat any failure here as fatal: the
    /// process must not serve traffic without a working store.
    pub async fn new(config: &crate::config::RedisConfig) -> Result<Self, AppError> {
        tracing::info!(url = %config.url, "Connecting to Redis");
        let client = Client::open(config.url.clone())?;

        // ConnectionManager reconnects automatically on transient drops
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            AppError::RedisError(e)
        })?;

        let store = Self {
            _client: client,
            manager,
        };
        store.health_check().await?;

        tracing::info!("Successfully connected to Redis");
        Ok(store)
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: i64,
    ) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(AppError::RedisError)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.manager.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(AppError::RedisError)
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let mut conn = self.manager.clone();
        redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(AppError::RedisError)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), AppError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.manager.clone();
        redis::cmd("DEL")
            .arg(keys)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(AppError::RedisError)
    }

    async fn delete_by_prefix(&self, prefix: &str, exclude: &[String]) -> Result<u64, AppError> {
        let mut conn = self.manager.clone();
        let pattern = format!("{}*", prefix);

        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(AppError::RedisError)?;
            keys.extend(batch.into_iter().filter(|k| !exclude.contains(k)));
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted = keys.len() as u64;
        redis::cmd("DEL")
            .arg(&keys)
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(AppError::RedisError)?;
        Ok(deleted)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(AppError::RedisError)
    }
}

/// In-memory store for tests. TTLs are recorded, not enforced, so tests can
/// assert expiry renewal directly.
#[derive(Default)]
pub struct MockStore {
    pub data: Mutex<HashMap<String, String>>,
    pub ttls: Mutex<HashMap<String, i64>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl_of(&self, key: &str) -> Option<i64> {
        self.ttls.lock().ok()?.get(key).copied()
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: i64,
    ) -> Result<(), AppError> {
        self.data
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?
            .insert(key.to_string(), value.to_string());
        self.ttls
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?
            .insert(key.to_string(), ttl_seconds);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let val = self
            .data
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?
            .get(key)
            .cloned();
        Ok(val)
    }

    async fn exists(&self, key: &str) -> Result<bool, AppError> {
        let exists = self
            .data
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?
            .contains_key(key);
        Ok(exists)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), AppError> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?;
        let mut ttls = self
            .ttls
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?;
        for key in keys {
            data.remove(key);
            ttls.remove(key);
        }
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str, exclude: &[String]) -> Result<u64, AppError> {
        let mut data = self
            .data
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?;
        let mut ttls = self
            .ttls
            .lock()
            .map_err(|e| AppError::InternalError(anyhow::anyhow!("mock mutex poisoned: {}", e)))?;
        let doomed: Vec<String> = data
            .keys()
            .filter(|k| k.starts_with(prefix) && !exclude.contains(k))
            .cloned()
            .collect();
        for key in &doomed {
            data.remove(key);
            ttls.remove(key);
        }
        Ok(doomed.len() as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
