use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
    /// Session TTL in seconds, matching the expiry actually written to the
    /// store.
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifySessionRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(length(min = 1))]
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifySessionResponse {
    pub valid: bool,
}

#[derive(Debug, Deserialize)]
pub struct RevokeSessionsQuery {
    /// Session to keep alive while all others are revoked.
    pub keep: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeSessionsResponse {
    pub revoked: u64,
}
