// Best-effort audit logging

use super::storage::AuditStore;
use super::types::{AuditAction, AuditEntry};
use std::sync::Arc;
use tracing::error;

/// Records user actions in the audit trail.
///
/// Logging is best effort: a failed append is logged and discarded so
/// that the operation being audited is never blocked or rolled back by
/// an audit failure. No error reaches the caller.
#[derive(Clone)]
pub struct AuditLogger {
    store: Arc<dyn AuditStore>,
}

impl AuditLogger {
    /// Create a new audit logger with the specified store backend.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append one entry to the audit trail, swallowing any store failure.
    pub async fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.store.append(entry).await {
            error!("Failed to store audit entry: {}", e);
        }
    }

    /// Log a successful login.
    pub async fn log_login(&self, user_id: i64, ip_address: &str) {
        let entry = AuditEntry::new(AuditAction::Login, "users")
            .with_actor(user_id)
            .with_record_id(user_id)
            .with_description("User logged in")
            .with_origin(ip_address);
        self.record(entry).await;
    }

    /// Log a logout.
    pub async fn log_logout(&self, user_id: i64, ip_address: &str) {
        let entry = AuditEntry::new(AuditAction::Logout, "users")
            .with_actor(user_id)
            .with_record_id(user_id)
            .with_description("User logged out")
            .with_origin(ip_address);
        self.record(entry).await;
    }

    /// Log creation of a row.
    pub async fn log_create(
        &self,
        actor_id: i64,
        table: &str,
        record_id: i64,
        description: impl Into<String>,
        ip_address: &str,
    ) {
        let entry = AuditEntry::new(AuditAction::Create, table)
            .with_actor(actor_id)
            .with_record_id(record_id)
            .with_description(description)
            .with_origin(ip_address);
        self.record(entry).await;
    }

    /// Log a read. `record_id` is absent for list-level reads.
    pub async fn log_read(
        &self,
        actor_id: i64,
        table: &str,
        record_id: Option<i64>,
        description: impl Into<String>,
        ip_address: &str,
    ) {
        let mut entry = AuditEntry::new(AuditAction::Read, table)
            .with_actor(actor_id)
            .with_description(description)
            .with_origin(ip_address);
        if let Some(id) = record_id {
            entry = entry.with_record_id(id);
        }
        self.record(entry).await;
    }

    /// Log an update of a row.
    pub async fn log_update(
        &self,
        actor_id: i64,
        table: &str,
        record_id: i64,
        description: impl Into<String>,
        ip_address: &str,
    ) {
        let entry = AuditEntry::new(AuditAction::Update, table)
            .with_actor(actor_id)
            .with_record_id(record_id)
            .with_description(description)
            .with_origin(ip_address);
        self.record(entry).await;
    }

    /// Log deletion of a row.
    pub async fn log_delete(
        &self,
        actor_id: i64,
        table: &str,
        record_id: i64,
        description: impl Into<String>,
        ip_address: &str,
    ) {
        let entry = AuditEntry::new(AuditAction::Delete, table)
            .with_actor(actor_id)
            .with_record_id(record_id)
            .with_description(description)
            .with_origin(ip_address);
        self.record(entry).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::storage::MemoryAuditStore;
    use async_trait::async_trait;

    /// A store whose inserts always fail.
    struct FailingStore;

    #[async_trait]
    impl AuditStore for FailingStore {
        async fn append(&self, _entry: AuditEntry) -> Result<(), String> {
            Err("Database write error".to_string())
        }
    }

    #[tokio::test]
    async fn test_log_login_stores_entry() {
        let store = Arc::new(MemoryAuditStore::new());
        let logger = AuditLogger::new(store.clone());

        logger.log_login(3, "192.168.1.20").await;

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.action, AuditAction::Login);
        assert_eq!(records[0].entry.actor_id, Some(3));
        assert_eq!(records[0].entry.record_id, Some(3));
        assert_eq!(records[0].entry.target_table, "users");
        assert_eq!(records[0].entry.ip_address, "192.168.1.20");
    }

    #[tokio::test]
    async fn test_log_read_without_record_id() {
        let store = Arc::new(MemoryAuditStore::new());
        let logger = AuditLogger::new(store.clone());

        logger
            .log_read(5, "products", None, "Viewed product list", "127.0.0.1")
            .await;

        let records = store.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].entry.record_id, None);
        assert_eq!(records[0].entry.description, "Viewed product list");
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let logger = AuditLogger::new(Arc::new(FailingStore));

        // None of these may panic or surface an error
        logger.log_login(1, "127.0.0.1").await;
        logger.log_logout(1, "127.0.0.1").await;
        logger
            .log_delete(1, "products", 9, "Deleted product 9", "127.0.0.1")
            .await;
        logger
            .record(AuditEntry::new(AuditAction::Read, "products"))
            .await;
    }

    #[tokio::test]
    async fn test_concurrent_records_each_produce_one_entry() {
        let store = Arc::new(MemoryAuditStore::new());
        let logger = AuditLogger::new(store.clone());

        let mut handles = Vec::new();
        for i in 0..32 {
            let logger = logger.clone();
            handles.push(tokio::spawn(async move {
                logger
                    .log_create(i, "products", i, format!("Created product {}", i), "127.0.0.1")
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let records = store.records().await;
        assert_eq!(records.len(), 32);

        // No entry lost, none duplicated
        let mut actors: Vec<i64> = records.iter().filter_map(|r| r.entry.actor_id).collect();
        actors.sort_unstable();
        assert_eq!(actors, (0..32).collect::<Vec<i64>>());
    }
}
