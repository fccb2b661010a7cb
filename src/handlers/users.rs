use axum::{extract::State, http::HeaderMap, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use super::client_ip;
use crate::credential::{hash_password, is_strong_password};
use crate::middleware::auth::CurrentUser;
use crate::models::{CreateUserRequest, UserInfo, UserRole};
use crate::state::AppState;
use crate::storage::StorageError;

pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserInfo>), (StatusCode, Json<Value>)> {
    if !current.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "Admin only."
            })),
        ));
    }

    let username = payload.username.trim();
    let full_name = payload.full_name.trim();
    let password = payload.password.trim();
    let role = payload.role.unwrap_or(UserRole::User);

    if username.is_empty() || password.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Username and password are required."
            })),
        ));
    }

    if !is_strong_password(password) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Weak password. Use upper+lower+digit+special and at least 8 chars."
            })),
        ));
    }

    let password_hash = hash_password(password).map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to hash password."
            })),
        )
    })?;

    match state
        .users
        .create(username, &password_hash, full_name, role)
        .await
    {
        Ok(user) => {
            state
                .audit
                .log_create(
                    current.user_id(),
                    "users",
                    user.user_id,
                    format!("Created user {}", username),
                    &client_ip(&headers),
                )
                .await;

            Ok((StatusCode::CREATED, Json(UserInfo::from(user))))
        }
        Err(StorageError::AlreadyExists) => Err((
            StatusCode::CONFLICT,
            Json(json!({
                "error": "Username already taken."
            })),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Storage error: {}", e)
            })),
        )),
    }
}
