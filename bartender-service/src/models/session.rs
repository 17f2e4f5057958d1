//! Session record persisted in the key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user session, addressable only by `(user_id, session_id)`.
///
/// `last_activity` is refreshed on every successful verification; the record
/// itself expires out of the store after the session TTL unless refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,

    /// Set once at creation, never mutated.
    pub created_at: DateTime<Utc>,

    /// Updated on every successful verification (sliding expiry).
    pub last_activity: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_info: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl SessionData {
    pub fn new(user_id: i64, device_info: Option<String>, ip_address: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created_at: now,
            last_activity: now,
            device_info,
            ip_address,
        }
    }
}
