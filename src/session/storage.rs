// Session storage backends

use super::types::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for session persistence.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn insert(&self, session: Session) -> Result<(), String>;
    async fn get(&self, session_id: &str) -> Result<Option<Session>, String>;
    async fn update(&self, session: Session) -> Result<(), String>;
    async fn remove(&self, session_id: &str) -> Result<(), String>;
}

/// In-memory session storage.
pub struct MemorySessionStorage {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn insert(&self, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn update(&self, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn remove(&self, session_id: &str) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
        Ok(())
    }
}
