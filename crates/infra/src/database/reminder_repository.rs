//! SQLite-backed reminder store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use learnarc_core::notifications::ports::ReminderStore;
use learnarc_domain::{LearnArcError, Reminder, Result};
use rusqlite::{Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{bool_to_int, datetime_from_ts, int_to_bool, parse_uuid};

/// Reminder persistence.
pub struct SqliteReminderRepository {
    db: Arc<DbManager>,
}

impl SqliteReminderRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

const INSERT_REMINDER_SQL: &str = "INSERT INTO reminders (
        id, title, message, video_id, scheduled_for, fired, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

const PENDING_REMINDERS_SQL: &str = "SELECT id, title, message, video_id, scheduled_for, fired,
        created_at
    FROM reminders WHERE fired = 0 ORDER BY scheduled_for ASC";

const DUE_REMINDERS_SQL: &str = "SELECT id, title, message, video_id, scheduled_for, fired,
        created_at
    FROM reminders WHERE fired = 0 AND scheduled_for <= ?1 ORDER BY scheduled_for ASC";

const MARK_FIRED_SQL: &str = "UPDATE reminders SET fired = 1 WHERE id = ?1";

fn map_reminder_row(row: &Row<'_>) -> rusqlite::Result<(String, Reminder)> {
    let raw_id: String = row.get(0)?;
    let reminder = Reminder {
        id: Uuid::nil(),
        title: row.get(1)?,
        message: row.get(2)?,
        video_id: row.get(3)?,
        scheduled_for: datetime_from_ts(row.get(4)?),
        fired: int_to_bool(row.get(5)?),
        created_at: datetime_from_ts(row.get(6)?),
    };
    Ok((raw_id, reminder))
}

fn finish_reminder(raw: (String, Reminder)) -> Result<Reminder> {
    let (raw_id, mut reminder) = raw;
    reminder.id = parse_uuid(&raw_id)?;
    Ok(reminder)
}

#[async_trait]
impl ReminderStore for SqliteReminderRepository {
    async fn add(&self, reminder: Reminder) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let id = reminder.id.to_string();
            let params: [&dyn ToSql; 7] = [
                &id,
                &reminder.title,
                &reminder.message,
                &reminder.video_id,
                &reminder.scheduled_for.timestamp(),
                &bool_to_int(reminder.fired),
                &reminder.created_at.timestamp(),
            ];
            conn.execute(INSERT_REMINDER_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn pending(&self) -> Result<Vec<Reminder>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Reminder>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(PENDING_REMINDERS_SQL).map_err(map_sql_error)?;
            let raw = stmt
                .query_map([], map_reminder_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            raw.into_iter().map(finish_reminder).collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn due(&self, now: DateTime<Utc>, lead_minutes: u32) -> Result<Vec<Reminder>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Reminder>> {
            let conn = db.get_connection()?;
            // A reminder is due once `now` is within the lead window.
            let cutoff = (now + Duration::minutes(i64::from(lead_minutes))).timestamp();
            let mut stmt = conn.prepare(DUE_REMINDERS_SQL).map_err(map_sql_error)?;
            let raw = stmt
                .query_map([cutoff], map_reminder_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            raw.into_iter().map(finish_reminder).collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_fired(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed =
                conn.execute(MARK_FIRED_SQL, [id.to_string()]).map_err(map_sql_error)?;
            if changed == 0 {
                return Err(LearnArcError::NotFound(format!("reminder {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteReminderRepository, TempDir) {
        let temp_dir = TempDir::new().expect("tempdir created");
        let db_path = temp_dir.path().join("learnarc.db");
        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");
        (SqliteReminderRepository::new(manager), temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn due_respects_lead_window() {
        let (repo, _tmp) = setup();
        let now = Utc::now();

        repo.add(Reminder::new("soon", "m", now + Duration::minutes(5))).await.expect("soon");
        repo.add(Reminder::new("later", "m", now + Duration::hours(2))).await.expect("later");

        let due = repo.due(now, 10).await.expect("due");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].title, "soon");

        // Without a lead window the five-minute reminder is not yet due.
        let due = repo.due(now, 0).await.expect("due no lead");
        assert!(due.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fired_reminders_leave_pending() {
        let (repo, _tmp) = setup();
        let now = Utc::now();

        let reminder = Reminder::new("one", "m", now);
        repo.add(reminder.clone()).await.expect("add");
        assert_eq!(repo.pending().await.expect("pending").len(), 1);

        repo.mark_fired(reminder.id).await.expect("fire");
        assert!(repo.pending().await.expect("pending").is_empty());
        assert!(repo.due(now, 10).await.expect("due").is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mark_fired_unknown_id_is_not_found() {
        let (repo, _tmp) = setup();
        let err = repo.mark_fired(Uuid::new_v4()).await.expect_err("should fail");
        assert!(matches!(err, LearnArcError::NotFound(_)));
    }
}
