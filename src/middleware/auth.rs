use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::models::UserRole;
use crate::session::Session;
use crate::state::AppState;

// Extension to store the authenticated session in the request
#[derive(Clone)]
pub struct CurrentUser {
    pub session: Session,
}

impl CurrentUser {
    pub fn user_id(&self) -> i64 {
        self.session.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.session.role == UserRole::Admin
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // Extract the Authorization header
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Check if it starts with "Bearer "
    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Extract the session token
    let token = &auth_header[7..];

    // Resolve the session; expired and unknown tokens are both 401
    let session = state
        .sessions
        .get_session(token)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Add the session to the request extensions
    request.extensions_mut().insert(CurrentUser { session });

    Ok(next.run(request).await)
}
