//! SQLite-backed notification queue and settings store.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use learnarc_core::notifications::ports::{NotificationQueue, NotificationSettingsStore};
use learnarc_domain::{
    LearnArcError, Notification, NotificationKind, NotificationSettings, Result,
};
use rusqlite::{OptionalExtension, Row, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{bool_to_int, datetime_from_ts, int_to_bool, parse_uuid};

/// Notification and settings persistence.
pub struct SqliteNotificationRepository {
    db: Arc<DbManager>,
}

impl SqliteNotificationRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

const INSERT_NOTIFICATION_SQL: &str = "INSERT INTO notifications (
        id, kind, title, message, video_id, scheduled_for, read, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

const LIST_NOTIFICATIONS_SQL: &str = "SELECT id, kind, title, message, video_id, scheduled_for,
        read, created_at
    FROM notifications ORDER BY created_at DESC, id DESC";

const LIST_UNREAD_SQL: &str = "SELECT id, kind, title, message, video_id, scheduled_for,
        read, created_at
    FROM notifications WHERE read = 0 ORDER BY created_at DESC, id DESC";

const MARK_READ_SQL: &str = "UPDATE notifications SET read = 1 WHERE id = ?1";

const SELECT_SETTINGS_SQL: &str = "SELECT enabled, completion_notifications,
        daily_goal_reminders, reminder_lead_minutes, daily_goal
    FROM notification_settings WHERE id = 1";

const UPSERT_SETTINGS_SQL: &str = "INSERT OR REPLACE INTO notification_settings (
        id, enabled, completion_notifications, daily_goal_reminders,
        reminder_lead_minutes, daily_goal
    ) VALUES (1, ?1, ?2, ?3, ?4, ?5)";

fn map_notification_row(row: &Row<'_>) -> rusqlite::Result<(String, String, Notification)> {
    let raw_id: String = row.get(0)?;
    let raw_kind: String = row.get(1)?;
    let notification = Notification {
        id: Uuid::nil(),
        kind: NotificationKind::Completion,
        title: row.get(2)?,
        message: row.get(3)?,
        video_id: row.get(4)?,
        scheduled_for: datetime_from_ts(row.get(5)?),
        read: int_to_bool(row.get(6)?),
        created_at: datetime_from_ts(row.get(7)?),
    };
    Ok((raw_id, raw_kind, notification))
}

fn finish_notification(raw: (String, String, Notification)) -> Result<Notification> {
    let (raw_id, raw_kind, mut notification) = raw;
    notification.id = parse_uuid(&raw_id)?;
    notification.kind = NotificationKind::from_str(&raw_kind)
        .map_err(|err| LearnArcError::Database(format!("invalid notification kind: {err}")))?;
    Ok(notification)
}

#[async_trait]
impl NotificationQueue for SqliteNotificationRepository {
    async fn push(&self, notification: Notification) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let id = notification.id.to_string();
            let kind = notification.kind.to_string();
            let params: [&dyn ToSql; 8] = [
                &id,
                &kind,
                &notification.title,
                &notification.message,
                &notification.video_id,
                &notification.scheduled_for.timestamp(),
                &bool_to_int(notification.read),
                &notification.created_at.timestamp(),
            ];
            conn.execute(INSERT_NOTIFICATION_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self, unread_only: bool) -> Result<Vec<Notification>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Notification>> {
            let conn = db.get_connection()?;
            let sql = if unread_only { LIST_UNREAD_SQL } else { LIST_NOTIFICATIONS_SQL };
            let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
            let raw = stmt
                .query_map([], map_notification_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            raw.into_iter().map(finish_notification).collect()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let changed = conn
                .execute(MARK_READ_SQL, [id.to_string()])
                .map_err(map_sql_error)?;
            if changed == 0 {
                return Err(LearnArcError::NotFound(format!("notification {id}")));
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl NotificationSettingsStore for SqliteNotificationRepository {
    async fn get(&self) -> Result<NotificationSettings> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<NotificationSettings> {
            let conn = db.get_connection()?;
            let settings = conn
                .query_row(SELECT_SETTINGS_SQL, [], |row| {
                    Ok(NotificationSettings {
                        enabled: int_to_bool(row.get(0)?),
                        completion_notifications: int_to_bool(row.get(1)?),
                        daily_goal_reminders: int_to_bool(row.get(2)?),
                        reminder_lead_minutes: row.get::<_, i64>(3)? as u32,
                        daily_goal: row.get::<_, i64>(4)? as u32,
                    })
                })
                .optional()
                .map_err(map_sql_error)?;
            Ok(settings.unwrap_or_default())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn put(&self, settings: &NotificationSettings) -> Result<()> {
        let db = Arc::clone(&self.db);
        let settings = settings.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 5] = [
                &bool_to_int(settings.enabled),
                &bool_to_int(settings.completion_notifications),
                &bool_to_int(settings.daily_goal_reminders),
                &i64::from(settings.reminder_lead_minutes),
                &i64::from(settings.daily_goal),
            ];
            conn.execute(UPSERT_SETTINGS_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
