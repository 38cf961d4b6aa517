//! User and session types
//!
//! Users are created on first OAuth sign-in; sessions are opaque bearer
//! tokens with a fixed lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Stable identifier issued by the OAuth provider (`sub` claim).
    pub provider_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

/// An opaque session token bound to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn session_expiry_is_inclusive() {
        let now = Utc::now();
        let session = Session {
            token: "tok".into(),
            user_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(1)));
        assert!(session.is_expired(now + Duration::hours(2)));
    }
}
