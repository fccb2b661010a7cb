// Audit trail types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin address recorded when the caller does not know the real one.
pub const DEFAULT_ORIGIN: &str = "127.0.0.1";

/// Action recorded in the audit trail, stored as its uppercase short code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Login,
    Logout,
    Create,
    Read,
    Update,
    Delete,
}

impl AuditAction {
    /// Short code stored in the `action_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
            AuditAction::Create => "CREATE",
            AuditAction::Read => "READ",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }
}

/// A single user-attributed action, before the store has assigned it an
/// id and a creation timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// User who performed the action, `None` for anonymous or system actions.
    pub actor_id: Option<i64>,
    /// What happened.
    pub action: AuditAction,
    /// Table the action targeted.
    pub target_table: String,
    /// Primary key of the affected row, `None` for list-level reads.
    pub record_id: Option<i64>,
    /// Human-readable description of the action.
    pub description: String,
    /// Address the request originated from.
    pub ip_address: String,
}

/// An audit entry as persisted, with store-assigned id and timestamp.
/// Records are append-only; nothing updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: AuditEntry,
}

impl AuditEntry {
    /// Create an entry for the given action and target table. The origin
    /// address starts out as the loopback placeholder.
    pub fn new(action: AuditAction, target_table: impl Into<String>) -> Self {
        Self {
            actor_id: None,
            action,
            target_table: target_table.into(),
            record_id: None,
            description: String::new(),
            ip_address: DEFAULT_ORIGIN.to_string(),
        }
    }

    pub fn with_actor(mut self, actor_id: i64) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    pub fn with_record_id(mut self, record_id: i64) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_origin(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = ip_address.into();
        self
    }
}
