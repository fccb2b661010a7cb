// Session types

use crate::models::{User, UserRole};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session lifetime settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: i64,
    /// Absolute lifetime in seconds, regardless of activity.
    #[serde(default = "default_absolute_timeout_secs")]
    pub absolute_timeout_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            absolute_timeout_secs: default_absolute_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> i64 {
    3600 // 1 hour idle timeout
}

fn default_absolute_timeout_secs() -> i64 {
    86400 // 24 hours absolute timeout
}

/// A logged-in user's server-side session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Address the session was created from.
    pub ip_address: String,
}

impl Session {
    /// Create a session for an authenticated user.
    pub fn new(user: &User, ip_address: String, config: &SessionConfig) -> Self {
        let now = Utc::now();
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user.user_id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            created_at: now,
            last_activity_at: now,
            expires_at: now + Duration::seconds(config.absolute_timeout_secs),
            ip_address,
        }
    }

    /// Whether the session is still usable under the given settings.
    pub fn is_active(&self, config: &SessionConfig) -> bool {
        let now = Utc::now();

        if now > self.expires_at {
            return false;
        }

        (now - self.last_activity_at).num_seconds() <= config.timeout_secs
    }

    /// Refresh the last-activity timestamp.
    pub fn touch(&mut self) {
        self.last_activity_at = Utc::now();
    }
}
