//! Local session issuance on top of the user repository.

use std::sync::Arc;

use chrono::{Duration, Utc};
use learnarc_domain::{LearnArcError, Result, Session, User};
use rand::RngCore;
use tracing::info;
use uuid::Uuid;

use super::manager::UserInfo;
use crate::database::SqliteUserRepository;

/// Issues and validates opaque bearer sessions.
pub struct SessionManager {
    users: Arc<SqliteUserRepository>,
    session_ttl: Duration,
}

impl SessionManager {
    pub fn new(users: Arc<SqliteUserRepository>, session_ttl_hours: i64) -> Self {
        Self { users, session_ttl: Duration::hours(session_ttl_hours.max(1)) }
    }

    /// Upsert the user for a completed sign-in and issue a session.
    pub async fn sign_in(&self, info: UserInfo) -> Result<(User, Session)> {
        let now = Utc::now();
        let display_name =
            if info.name.is_empty() { info.email.clone() } else { info.name.clone() };

        let user = self
            .users
            .upsert_user(User {
                id: Uuid::new_v4(),
                provider_id: info.sub,
                email: info.email,
                display_name,
                avatar_url: info.picture,
                created_at: now,
                last_login_at: now,
            })
            .await?;

        let session = Session {
            token: random_token(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.users.insert_session(session.clone()).await?;

        info!(user_id = %user.id, "session issued");
        Ok((user, session))
    }

    /// Resolve a bearer token to its user. Expired sessions are deleted and
    /// rejected.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let session = self
            .users
            .session(token)
            .await?
            .ok_or_else(|| LearnArcError::Auth("unknown session".into()))?;

        if session.is_expired(Utc::now()) {
            self.users.delete_session(token).await?;
            return Err(LearnArcError::Auth("session expired".into()));
        }

        self.users
            .user(session.user_id)
            .await?
            .ok_or_else(|| LearnArcError::Auth("session user no longer exists".into()))
    }

    /// Revoke a session. Unknown tokens are a no-op.
    pub async fn sign_out(&self, token: &str) -> Result<()> {
        self.users.delete_session(token).await
    }
}

/// 32 random bytes, hex encoded.
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::database::DbManager;

    fn setup(ttl_hours: i64) -> (SessionManager, TempDir) {
        let temp_dir = TempDir::new().expect("tempdir created");
        let db_path = temp_dir.path().join("learnarc.db");
        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");
        let users = Arc::new(SqliteUserRepository::new(manager));
        (SessionManager::new(users, ttl_hours), temp_dir)
    }

    fn info() -> UserInfo {
        UserInfo {
            sub: "google-123".into(),
            email: "user@example.com".into(),
            name: "User".into(),
            picture: None,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sign_in_issues_usable_session() {
        let (manager, _tmp) = setup(1);

        let (user, session) = manager.sign_in(info()).await.expect("sign in");
        assert_eq!(session.token.len(), 64);

        let authed = manager.authenticate(&session.token).await.expect("authenticate");
        assert_eq!(authed.id, user.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn repeat_sign_in_reuses_user() {
        let (manager, _tmp) = setup(1);

        let (first, _) = manager.sign_in(info()).await.expect("first");
        let (second, _) = manager.sign_in(info()).await.expect("second");
        assert_eq!(first.id, second.id);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sign_out_revokes_session() {
        let (manager, _tmp) = setup(1);

        let (_, session) = manager.sign_in(info()).await.expect("sign in");
        manager.sign_out(&session.token).await.expect("sign out");

        let err = manager.authenticate(&session.token).await.expect_err("revoked");
        assert!(matches!(err, LearnArcError::Auth(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unknown_token_is_rejected() {
        let (manager, _tmp) = setup(1);
        let err = manager.authenticate("nope").await.expect_err("unknown");
        assert!(matches!(err, LearnArcError::Auth(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blank_name_falls_back_to_email() {
        let (manager, _tmp) = setup(1);
        let mut anonymous = info();
        anonymous.name = String::new();

        let (user, _) = manager.sign_in(anonymous).await.expect("sign in");
        assert_eq!(user.display_name, "user@example.com");
    }
}
