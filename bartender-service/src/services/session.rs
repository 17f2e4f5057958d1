//! Session lifecycle: creation, verification with sliding expiry, deletion.

use crate::models::SessionData;
use crate::services::redis::KeyValueStore;
use chrono::Utc;
use service_core::error::AppError;
use std::sync::Arc;
use uuid::Uuid;

pub const SESSION_KEY_PREFIX: &str = "user_session";

#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    ttl_seconds: i64,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_seconds: i64) -> Self {
        Self { store, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    pub fn session_key(user_id: i64, session_id: &str) -> String {
        format!("{}:{}:{}", SESSION_KEY_PREFIX, user_id, session_id)
    }

    fn user_prefix(user_id: i64) -> String {
        format!("{}:{}:", SESSION_KEY_PREFIX, user_id)
    }

    /// Create a new session and return its id. The 128-bit random token
    /// makes collisions negligible; no uniqueness check is needed.
    pub async fn create_session(
        &self,
        user_id: i64,
        device_info: Option<String>,
        ip_address: Option<String>,
    ) -> Result<String, AppError> {
        let session_id = Uuid::new_v4().to_string();
        let data = SessionData::new(user_id, device_info, ip_address);
        let payload = serde_json::to_string(&data)
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

        let key = Self::session_key(user_id, &session_id);
        self.store
            .set_with_ttl(&key, &payload, self.ttl_seconds)
            .await?;

        tracing::info!(user_id, session_id = %session_id, "Created new session");
        Ok(session_id)
    }

    /// Check whether a session exists. A hit refreshes `last_activity` and
    /// renews the TTL to the full window, so actively-used sessions never
    /// expire. Absence is a plain `false`, not an error.
    pub async fn verify_session(&self, user_id: i64, session_id: &str) -> Result<bool, AppError> {
        let key = Self::session_key(user_id, session_id);

        let Some(raw) = self.store.get(&key).await? else {
            tracing::warn!(user_id, session_id, "Session not found");
            return Ok(false);
        };

        let mut data: SessionData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(user_id, session_id, error = %e, "Unreadable session record");
                return Ok(false);
            }
        };

        data.last_activity = Utc::now();
        let payload = serde_json::to_string(&data)
            .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;
        self.store
            .set_with_ttl(&key, &payload, self.ttl_seconds)
            .await?;

        Ok(true)
    }

    /// Read-only fetch; no TTL refresh.
    pub async fn get_session_data(
        &self,
        user_id: i64,
        session_id: &str,
    ) -> Result<Option<SessionData>, AppError> {
        let key = Self::session_key(user_id, session_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(data) => Ok(Some(data)),
            Err(e) => {
                tracing::warn!(user_id, session_id, error = %e, "Unreadable session record");
                Ok(None)
            }
        }
    }

    /// Unconditional delete; succeeds whether or not the session existed.
    pub async fn delete_session(&self, user_id: i64, session_id: &str) -> Result<(), AppError> {
        let key = Self::session_key(user_id, session_id);
        self.store.delete(std::slice::from_ref(&key)).await?;
        tracing::info!(user_id, session_id, "Deleted session");
        Ok(())
    }

    /// Revoke every session of a user, optionally keeping one alive
    /// (logout-everywhere). Returns the number of sessions removed.
    pub async fn revoke_user_sessions(
        &self,
        user_id: i64,
        keep: Option<&str>,
    ) -> Result<u64, AppError> {
        let exclude: Vec<String> = keep
            .map(|sid| vec![Self::session_key(user_id, sid)])
            .unwrap_or_default();
        let revoked = self
            .store
            .delete_by_prefix(&Self::user_prefix(user_id), &exclude)
            .await?;
        tracing::info!(user_id, revoked, "Revoked user sessions");
        Ok(revoked)
    }
}
