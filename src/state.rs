// Shared application state

use crate::audit::AuditLogger;
use crate::session::SessionManager;
use crate::storage::{ProductStore, UserStore};
use std::sync::Arc;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub sessions: Arc<SessionManager>,
    pub audit: AuditLogger,
}
