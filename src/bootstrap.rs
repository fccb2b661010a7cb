// First-run account seeding

use crate::credential::hash_password;
use crate::models::UserRole;
use crate::storage::UserStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Create default admin and user accounts if the users table is empty,
/// so a fresh install is immediately usable. A populated store is left
/// untouched.
pub async fn create_initial_accounts(users: &Arc<dyn UserStore>) -> Result<(), String> {
    let count = users
        .count()
        .await
        .map_err(|e| format!("Failed to count users: {}", e))?;

    if count > 0 {
        return Ok(());
    }

    info!("No users found. Creating default admin and user accounts...");

    let defaults = [
        ("admin", "Admin@123", "System Administrator", UserRole::Admin),
        ("user", "User@123", "Standard User", UserRole::User),
    ];

    for (username, password, full_name, role) in defaults {
        let password_hash = hash_password(password)?;
        users
            .create(username, &password_hash, full_name, role)
            .await
            .map_err(|e| format!("Failed to create account '{}': {}", username, e))?;
        info!("Created default account {} ({})", username, role.as_str());
    }

    warn!("Default accounts use well-known passwords. Change them before exposing this server.");
    Ok(())
}
