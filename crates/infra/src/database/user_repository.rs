//! SQLite-backed user and session storage.
//!
//! Not a core port: consumed directly by the auth layer, which owns the
//! sign-in and session semantics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use learnarc_domain::{Result, Session, User};
use rusqlite::{OptionalExtension, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{datetime_from_ts, parse_uuid};

/// User and session persistence.
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

const UPSERT_USER_SQL: &str = "INSERT INTO users (
        id, provider_id, email, display_name, avatar_url, created_at, last_login_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(provider_id) DO UPDATE SET
        email = excluded.email,
        display_name = excluded.display_name,
        avatar_url = excluded.avatar_url,
        last_login_at = excluded.last_login_at";

const SELECT_USER_BY_PROVIDER_SQL: &str = "SELECT id, provider_id, email, display_name,
        avatar_url, created_at, last_login_at
    FROM users WHERE provider_id = ?1";

const SELECT_USER_SQL: &str = "SELECT id, provider_id, email, display_name, avatar_url,
        created_at, last_login_at
    FROM users WHERE id = ?1";

const INSERT_SESSION_SQL: &str =
    "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?1, ?2, ?3, ?4)";

const SELECT_SESSION_SQL: &str =
    "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1";

const DELETE_SESSION_SQL: &str = "DELETE FROM sessions WHERE token = ?1";

const PURGE_SESSIONS_SQL: &str = "DELETE FROM sessions WHERE expires_at <= ?1";

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<(String, User)> {
    let raw_id: String = row.get(0)?;
    let user = User {
        id: Uuid::nil(),
        provider_id: row.get(1)?,
        email: row.get(2)?,
        display_name: row.get(3)?,
        avatar_url: row.get(4)?,
        created_at: datetime_from_ts(row.get(5)?),
        last_login_at: datetime_from_ts(row.get(6)?),
    };
    Ok((raw_id, user))
}

fn finish_user(raw: (String, User)) -> Result<User> {
    let (raw_id, mut user) = raw;
    user.id = parse_uuid(&raw_id)?;
    Ok(user)
}

fn map_session_row(row: &Row<'_>) -> rusqlite::Result<(String, Session)> {
    let raw_user_id: String = row.get(1)?;
    let session = Session {
        token: row.get(0)?,
        user_id: Uuid::nil(),
        created_at: datetime_from_ts(row.get(2)?),
        expires_at: datetime_from_ts(row.get(3)?),
    };
    Ok((raw_user_id, session))
}

impl SqliteUserRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Insert or refresh a user keyed by the provider's stable id.
    pub async fn upsert_user(&self, user: User) -> Result<User> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<User> {
            let conn = db.get_connection()?;
            let id = user.id.to_string();
            let params: [&dyn ToSql; 7] = [
                &id,
                &user.provider_id,
                &user.email,
                &user.display_name,
                &user.avatar_url,
                &user.created_at.timestamp(),
                &user.last_login_at.timestamp(),
            ];
            conn.execute(UPSERT_USER_SQL, params.as_slice()).map_err(map_sql_error)?;

            // Re-read so callers see the stored id when the provider id
            // already existed.
            let raw = conn
                .query_row(SELECT_USER_BY_PROVIDER_SQL, [&user.provider_id], map_user_row)
                .map_err(map_sql_error)?;
            finish_user(raw)
        })
        .await
        .map_err(map_join_error)?
    }

    pub async fn user(&self, id: Uuid) -> Result<Option<User>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<User>> {
            let conn = db.get_connection()?;
            let raw = conn
                .query_row(SELECT_USER_SQL, [id.to_string()], map_user_row)
                .optional()
                .map_err(map_sql_error)?;
            raw.map(finish_user).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    pub async fn insert_session(&self, session: Session) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let user_id = session.user_id.to_string();
            let params: [&dyn ToSql; 4] = [
                &session.token,
                &user_id,
                &session.created_at.timestamp(),
                &session.expires_at.timestamp(),
            ];
            conn.execute(INSERT_SESSION_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    pub async fn session(&self, token: &str) -> Result<Option<Session>> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();
        task::spawn_blocking(move || -> Result<Option<Session>> {
            let conn = db.get_connection()?;
            let raw = conn
                .query_row(SELECT_SESSION_SQL, [&token], map_session_row)
                .optional()
                .map_err(map_sql_error)?;
            raw.map(|(raw_user_id, mut session)| {
                session.user_id = parse_uuid(&raw_user_id)?;
                Ok(session)
            })
            .transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    pub async fn delete_session(&self, token: &str) -> Result<()> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(DELETE_SESSION_SQL, [&token]).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    /// Delete sessions at or past their expiry. Returns the number purged.
    pub async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<usize> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<usize> {
            let conn = db.get_connection()?;
            conn.execute(PURGE_SESSIONS_SQL, [now.timestamp()]).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteUserRepository, TempDir) {
        let temp_dir = TempDir::new().expect("tempdir created");
        let db_path = temp_dir.path().join("learnarc.db");
        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");
        (SqliteUserRepository::new(manager), temp_dir)
    }

    fn user(provider_id: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            provider_id: provider_id.to_string(),
            email: "user@example.com".into(),
            display_name: "User".into(),
            avatar_url: None,
            created_at: now,
            last_login_at: now,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_keeps_original_id_for_known_provider() {
        let (repo, _tmp) = setup();

        let first = repo.upsert_user(user("google-123")).await.expect("first");
        let mut returning = user("google-123");
        returning.display_name = "Renamed".into();
        let second = repo.upsert_user(returning).await.expect("second");

        assert_eq!(second.id, first.id);
        assert_eq!(second.display_name, "Renamed");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn session_round_trip_and_purge() {
        let (repo, _tmp) = setup();
        let stored = repo.upsert_user(user("google-123")).await.expect("user");

        let now = Utc::now();
        let session = Session {
            token: "tok-1".into(),
            user_id: stored.id,
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        repo.insert_session(session.clone()).await.expect("insert session");

        let fetched = repo.session("tok-1").await.expect("get").expect("present");
        assert_eq!(fetched.user_id, stored.id);

        let purged = repo.purge_expired_sessions(now + Duration::hours(2)).await.expect("purge");
        assert_eq!(purged, 1);
        assert!(repo.session("tok-1").await.expect("get").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_session_is_idempotent() {
        let (repo, _tmp) = setup();
        repo.delete_session("missing").await.expect("delete");
    }
}
