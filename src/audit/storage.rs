// Audit store backends

use super::types::{AuditEntry, AuditRecord};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::mysql::MySqlPool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Trait for audit trail persistence.
///
/// The interface is append-only: there is no way to update or delete a
/// stored record through it. Each append is a single independent write,
/// so the trait is safe to call from many request contexts without
/// coordination.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one entry, assigning it an id and a creation timestamp.
    async fn append(&self, entry: AuditEntry) -> Result<(), String>;
}

/// In-memory audit store.
/// Suitable for development and testing.
pub struct MemoryAuditStore {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of everything appended so far, in insertion order.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

impl Default for MemoryAuditStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn append(&self, entry: AuditEntry) -> Result<(), String> {
        let mut records = self.records.write().await;
        debug!("Storing audit entry: {}", entry.action.as_str());
        let record = AuditRecord {
            id: records.len() as i64 + 1,
            created_at: Utc::now(),
            entry,
        };
        records.push(record);
        Ok(())
    }
}

/// MySQL audit store writing to the `audit_logs` table. The database
/// assigns the id and the creation timestamp.
pub struct MySqlAuditStore {
    pool: MySqlPool,
}

impl MySqlAuditStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for MySqlAuditStore {
    async fn append(&self, entry: AuditEntry) -> Result<(), String> {
        sqlx::query(
            "INSERT INTO audit_logs (user_id, action_type, table_name, record_id, description, ip_address) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.actor_id)
        .bind(entry.action.as_str())
        .bind(&entry.target_table)
        .bind(entry.record_id)
        .bind(&entry.description)
        .bind(&entry.ip_address)
        .execute(&self.pool)
        .await
        .map_err(|e| format!("Failed to insert audit entry: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::AuditAction;

    #[tokio::test]
    async fn test_memory_store_assigns_ids_and_timestamps() {
        let store = MemoryAuditStore::new();

        store
            .append(AuditEntry::new(AuditAction::Login, "users").with_actor(1))
            .await
            .unwrap();
        store
            .append(AuditEntry::new(AuditAction::Read, "products").with_actor(1))
            .await
            .unwrap();

        let records = store.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);
        assert!(records[0].created_at <= records[1].created_at);
        assert_eq!(records[0].entry.action, AuditAction::Login);
    }

    #[tokio::test]
    async fn test_memory_store_keeps_insertion_order() {
        let store = MemoryAuditStore::new();

        for i in 0..5 {
            store
                .append(
                    AuditEntry::new(AuditAction::Create, "products")
                        .with_record_id(i)
                        .with_description(format!("Created product {}", i)),
                )
                .await
                .unwrap();
        }

        let records = store.records().await;
        let ids: Vec<i64> = records.iter().map(|r| r.entry.record_id.unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }
}
