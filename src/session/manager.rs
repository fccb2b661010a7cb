// Session lifecycle management

use super::storage::SessionStorage;
use super::types::{Session, SessionConfig};
use crate::models::User;
use std::sync::Arc;
use tracing::{debug, info};

/// Handles session creation, validation and teardown.
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>, config: SessionConfig) -> Self {
        Self { storage, config }
    }

    /// Create a session for an authenticated user.
    pub async fn create_session(&self, user: &User, ip_address: &str) -> Result<Session, String> {
        let session = Session::new(user, ip_address.to_string(), &self.config);
        self.storage.insert(session.clone()).await?;

        info!(
            "Created session {} for user {}",
            session.session_id, user.username
        );

        Ok(session)
    }

    /// Look up a session and refresh its activity timestamp. Sessions
    /// past their idle or absolute timeout are dropped and reported as
    /// absent.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<Session>, String> {
        match self.storage.get(session_id).await? {
            Some(mut session) if session.is_active(&self.config) => {
                session.touch();
                self.storage.update(session.clone()).await?;
                Ok(Some(session))
            }
            Some(session) => {
                debug!("Dropping expired session {}", session.session_id);
                self.storage.remove(&session.session_id).await?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Terminate a session (logout).
    pub async fn destroy_session(&self, session_id: &str) -> Result<(), String> {
        self.storage.remove(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::session::storage::MemorySessionStorage;
    use chrono::{Duration, Utc};

    fn test_user() -> User {
        User {
            user_id: 1,
            username: "admin".to_string(),
            password_hash: String::new(),
            full_name: "System Administrator".to_string(),
            role: UserRole::Admin,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_session() {
        let manager = SessionManager::new(
            Arc::new(MemorySessionStorage::new()),
            SessionConfig::default(),
        );

        let session = manager.create_session(&test_user(), "127.0.0.1").await.unwrap();
        let found = manager.get_session(&session.session_id).await.unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().user_id, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_session() {
        let manager = SessionManager::new(
            Arc::new(MemorySessionStorage::new()),
            SessionConfig::default(),
        );

        assert!(manager.get_session("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_destroyed_session_is_gone() {
        let manager = SessionManager::new(
            Arc::new(MemorySessionStorage::new()),
            SessionConfig::default(),
        );

        let session = manager.create_session(&test_user(), "127.0.0.1").await.unwrap();
        manager.destroy_session(&session.session_id).await.unwrap();

        assert!(manager.get_session(&session.session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_idle_session_is_dropped_on_access() {
        let storage = Arc::new(MemorySessionStorage::new());
        let config = SessionConfig::default();
        let manager = SessionManager::new(storage.clone(), config.clone());

        // Insert a session that idled past the timeout
        let mut session = Session::new(&test_user(), "127.0.0.1".to_string(), &config);
        session.last_activity_at = Utc::now() - Duration::seconds(config.timeout_secs + 60);
        let id = session.session_id.clone();
        storage.insert(session).await.unwrap();

        assert!(manager.get_session(&id).await.unwrap().is_none());
        // Dropped from storage, not just hidden
        assert!(storage.get(&id).await.unwrap().is_none());
    }
}
