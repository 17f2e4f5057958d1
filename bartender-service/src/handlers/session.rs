use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use std::net::SocketAddr;

use crate::{
    dtos::session::{
        CreateSessionRequest, RevokeSessionsQuery, RevokeSessionsResponse, SessionResponse,
        VerifySessionRequest, VerifySessionResponse,
    },
    utils::ValidatedJson,
    AppState,
};

/// Create a new session for a user.
pub async fn create_session(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    ValidatedJson(req): ValidatedJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let device_info = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let session_id = state
        .sessions
        .create_session(req.user_id, device_info, Some(addr.ip().to_string()))
        .await?;

    Ok((
        StatusCode::OK,
        Json(SessionResponse {
            session_id,
            expires_in: state.sessions.ttl_seconds(),
        }),
    ))
}

/// Verify a session, refreshing its sliding expiry on success.
pub async fn verify_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<VerifySessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let valid = state
        .sessions
        .verify_session(req.user_id, &req.session_id)
        .await?;
    Ok(Json(VerifySessionResponse { valid }))
}

/// Read-only session metadata fetch.
pub async fn get_session(
    State(state): State<AppState>,
    Path((user_id, session_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let data = state
        .sessions
        .get_session_data(user_id, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Session not found")))?;
    Ok(Json(data))
}

/// Delete a session (logout). Idempotent: succeeds whether or not the
/// session existed.
pub async fn delete_session(
    State(state): State<AppState>,
    Path((user_id, session_id)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    state.sessions.delete_session(user_id, &session_id).await?;
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Session deleted"
        })),
    ))
}

/// Revoke all sessions of a user, optionally keeping the current one.
pub async fn revoke_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<RevokeSessionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let revoked = state
        .sessions
        .revoke_user_sessions(user_id, query.keep.as_deref())
        .await?;
    Ok(Json(RevokeSessionsResponse { revoked }))
}
