use axum::{extract::State, http::HeaderMap, http::StatusCode, Extension, Json};
use serde_json::{json, Value};
use tracing::warn;

use super::client_ip;
use crate::credential::{hash_password, needs_rehash, verify_password};
use crate::middleware::auth::CurrentUser;
use crate::models::{LoginRequest, LoginResponse, UserInfo};
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, Json<Value>)> {
    let username = payload.username.trim();
    let password = payload.password.trim();
    let ip = client_ip(&headers);

    let user = state
        .users
        .find_active_by_username(username)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Storage error: {}", e)
                })),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Invalid username or inactive account."
                })),
            )
        })?;

    if !verify_password(password, &user.password_hash) {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "Invalid password."
            })),
        ));
    }

    // Lazy migration: a legacy hash that just verified gets rotated to
    // the current scheme while we still have the plaintext in hand.
    // Failures here must not fail the login.
    if needs_rehash(&user.password_hash) {
        match hash_password(password) {
            Ok(new_hash) => {
                if let Err(e) = state
                    .users
                    .update_password_hash(user.user_id, &new_hash)
                    .await
                {
                    warn!(
                        "Failed to rotate legacy password hash for {}: {}",
                        user.username, e
                    );
                }
            }
            Err(e) => warn!(
                "Failed to re-hash legacy password for {}: {}",
                user.username, e
            ),
        }
    }

    let session = state.sessions.create_session(&user, &ip).await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Failed to create session: {}", e)
            })),
        )
    })?;

    state.audit.log_login(user.user_id, &ip).await;

    Ok(Json(LoginResponse {
        token: session.session_id,
        user: UserInfo::from(user),
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let ip = client_ip(&headers);

    state.audit.log_logout(current.user_id(), &ip).await;

    state
        .sessions
        .destroy_session(&current.session.session_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to destroy session: {}", e)
                })),
            )
        })?;

    Ok(Json(json!({
        "message": "Logged out."
    })))
}
