pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod users;

use crate::audit::DEFAULT_ORIGIN;
use axum::http::HeaderMap;

/// Best-effort client address from proxy headers. Falls back to the
/// loopback placeholder when nothing usable is present.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| DEFAULT_ORIGIN.to_string())
}
