use std::sync::Arc;

use inventory_api::audit::{AuditAction, AuditLogger, MemoryAuditStore};
use inventory_api::bootstrap;
use inventory_api::credential::{hash_password, needs_rehash, verify_password};
use inventory_api::session::{MemorySessionStorage, SessionConfig, SessionManager};
use inventory_api::storage::memory::MemoryUserStore;
use inventory_api::storage::UserStore;

/// The default accounts seeded on first run must authenticate with
/// their documented passwords.
#[tokio::test]
async fn test_default_accounts_can_log_in() {
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    bootstrap::create_initial_accounts(&users).await.unwrap();

    let admin = users
        .find_active_by_username("admin")
        .await
        .unwrap()
        .expect("admin account seeded");
    assert!(verify_password("Admin@123", &admin.password_hash));
    assert!(!verify_password("wrong-password", &admin.password_hash));

    let user = users
        .find_active_by_username("user")
        .await
        .unwrap()
        .expect("user account seeded");
    assert!(verify_password("User@123", &user.password_hash));
}

/// Seeding runs only against an empty store.
#[tokio::test]
async fn test_seeding_is_idempotent() {
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());

    bootstrap::create_initial_accounts(&users).await.unwrap();
    bootstrap::create_initial_accounts(&users).await.unwrap();

    assert_eq!(users.count().await.unwrap(), 2);
}

/// A full login at the service layer: verify the password, open a
/// session, record the audit entry, then log out again.
#[tokio::test]
async fn test_login_flow_creates_session_and_audit_entry() {
    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    bootstrap::create_initial_accounts(&users).await.unwrap();

    let sessions = SessionManager::new(
        Arc::new(MemorySessionStorage::new()),
        SessionConfig::default(),
    );
    let audit_store = Arc::new(MemoryAuditStore::new());
    let audit = AuditLogger::new(audit_store.clone());

    let admin = users
        .find_active_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("Admin@123", &admin.password_hash));

    let session = sessions.create_session(&admin, "203.0.113.5").await.unwrap();
    audit.log_login(admin.user_id, "203.0.113.5").await;

    let found = sessions.get_session(&session.session_id).await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().username, "admin");

    audit.log_logout(admin.user_id, "203.0.113.5").await;
    sessions.destroy_session(&session.session_id).await.unwrap();
    assert!(sessions
        .get_session(&session.session_id)
        .await
        .unwrap()
        .is_none());

    let records = audit_store.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entry.action, AuditAction::Login);
    assert_eq!(records[0].entry.actor_id, Some(admin.user_id));
    assert_eq!(records[0].entry.ip_address, "203.0.113.5");
    assert_eq!(records[1].entry.action, AuditAction::Logout);
}

/// An account carrying a pre-migration hash verifies through the legacy
/// path and gets rotated to the current scheme, after which the same
/// password still works.
#[tokio::test]
async fn test_legacy_hash_lazy_migration() {
    // PBKDF2-HMAC-SHA256("Admin@123", "gx5fqGy0JnTZ", 260000)
    let legacy_hash = "pbkdf2:sha256:260000$gx5fqGy0JnTZ$51e060b15b52d03c8ebca69337d5b2eeddf795346df28427bed45024688461fb";

    let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
    let account = users
        .create("veteran", legacy_hash, "Pre-Migration User", inventory_api::models::UserRole::User)
        .await
        .unwrap();

    assert!(needs_rehash(&account.password_hash));
    assert!(verify_password("Admin@123", &account.password_hash));

    // What the login handler does after a successful legacy verification
    let new_hash = hash_password("Admin@123").unwrap();
    users
        .update_password_hash(account.user_id, &new_hash)
        .await
        .unwrap();

    let rotated = users
        .find_active_by_username("veteran")
        .await
        .unwrap()
        .unwrap();
    assert!(!needs_rehash(&rotated.password_hash));
    assert!(verify_password("Admin@123", &rotated.password_hash));
    assert!(!verify_password("Admin@124", &rotated.password_hash));
}
