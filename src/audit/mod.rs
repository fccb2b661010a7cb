// Audit trail: append-only records of user actions
// Failures here are never allowed to break the operation being audited

pub mod logger;
pub mod storage;
pub mod types;

pub use logger::AuditLogger;
pub use storage::{AuditStore, MemoryAuditStore, MySqlAuditStore};
pub use types::{AuditAction, AuditEntry, AuditRecord, DEFAULT_ORIGIN};
