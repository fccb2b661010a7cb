use axum::{extract::State, http::StatusCode, Extension, Json};
use serde_json::{json, Value};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let product_count = state.products.count().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Storage error: {}", e)
            })),
        )
    })?;

    let user_count = state.users.count().await.map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": format!("Storage error: {}", e)
            })),
        )
    })?;

    Ok(Json(json!({
        "user": {
            "user_id": current.session.user_id,
            "username": current.session.username,
            "full_name": current.session.full_name,
            "role": current.session.role,
        },
        "product_count": product_count,
        "user_count": user_count,
    })))
}
