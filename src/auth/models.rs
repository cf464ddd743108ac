use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Database model for the users table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: i64,
    pub email: String, // Lower-cased, unique
    pub name: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when registering a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

/// Database model for single-use sign-in links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MagicLinkModel {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl MagicLinkModel {
    /// Creates a fresh link for the user with a random token
    pub fn new(user_id: i64, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().simple().to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            used_at: None,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}
