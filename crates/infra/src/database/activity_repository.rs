//! SQLite-backed daily activity ledger.
//!
//! Activities are keyed by (video id, date) and join the `videos` table so
//! callers get the full video back with each record.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use learnarc_core::progress::ports::ActivityLedger;
use learnarc_domain::{DailyActivity, Result};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{
    bool_to_int, datetime_from_ts, int_to_bool, map_video_row, parse_date, parse_uuid,
    upsert_video,
};

/// Daily activity persistence.
pub struct SqliteActivityRepository {
    db: Arc<DbManager>,
}

impl SqliteActivityRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

const UPSERT_ACTIVITY_SQL: &str = "INSERT OR REPLACE INTO daily_activities (
        id, video_id, date, watch_secs, completed, created_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const ACTIVITY_SELECT: &str = "SELECT a.id, a.video_id, a.date, a.watch_secs, a.completed,
        a.created_at,
        v.id, v.title, v.channel_title, v.thumbnail, v.description, v.published_at, v.duration
    FROM daily_activities a
    JOIN videos v ON v.id = a.video_id";

const FIND_ACTIVITY_SQL: &str = "SELECT a.id, a.video_id, a.date, a.watch_secs, a.completed,
        a.created_at,
        v.id, v.title, v.channel_title, v.thumbnail, v.description, v.published_at, v.duration
    FROM daily_activities a
    JOIN videos v ON v.id = a.video_id
    WHERE a.video_id = ?1 AND a.date = ?2";

const ACTIVE_DATES_SQL: &str =
    "SELECT DISTINCT date FROM daily_activities ORDER BY date ASC";

fn map_activity_row(row: &Row<'_>) -> rusqlite::Result<(String, String, DailyActivity)> {
    // id and date come back as strings and are parsed outside the rusqlite
    // mapper so parse failures surface as domain errors.
    let raw_id: String = row.get(0)?;
    let raw_date: String = row.get(2)?;
    let activity = DailyActivity {
        id: uuid::Uuid::nil(),
        video_id: row.get(1)?,
        video: map_video_row(row, 6)?,
        date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default(),
        watch_secs: row.get(3)?,
        completed: int_to_bool(row.get(4)?),
        created_at: datetime_from_ts(row.get(5)?),
    };
    Ok((raw_id, raw_date, activity))
}

fn finish_activity(raw: (String, String, DailyActivity)) -> Result<DailyActivity> {
    let (raw_id, raw_date, mut activity) = raw;
    activity.id = parse_uuid(&raw_id)?;
    activity.date = parse_date(&raw_date)?;
    Ok(activity)
}

fn query_activities(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<DailyActivity>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let raw_rows = stmt
        .query_map(params, map_activity_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    raw_rows.into_iter().map(finish_activity).collect()
}

#[async_trait]
impl ActivityLedger for SqliteActivityRepository {
    async fn upsert(&self, activity: DailyActivity) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            upsert_video(&conn, &activity.video).map_err(map_sql_error)?;
            let id = activity.id.to_string();
            let date = activity.date.to_string();
            let params: [&dyn ToSql; 6] = [
                &id,
                &activity.video_id,
                &date,
                &activity.watch_secs,
                &bool_to_int(activity.completed),
                &activity.created_at.timestamp(),
            ];
            conn.execute(UPSERT_ACTIVITY_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find(&self, video_id: &str, date: NaiveDate) -> Result<Option<DailyActivity>> {
        let db = Arc::clone(&self.db);
        let video_id = video_id.to_string();
        task::spawn_blocking(move || -> Result<Option<DailyActivity>> {
            let conn = db.get_connection()?;
            let raw = conn
                .query_row(
                    FIND_ACTIVITY_SQL,
                    [&video_id, &date.to_string()],
                    map_activity_row,
                )
                .optional()
                .map_err(map_sql_error)?;
            raw.map(finish_activity).transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    async fn for_date(&self, date: NaiveDate) -> Result<Vec<DailyActivity>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<DailyActivity>> {
            let conn = db.get_connection()?;
            let sql = format!("{ACTIVITY_SELECT} WHERE a.date = ?1 ORDER BY a.created_at ASC");
            let date = date.to_string();
            let params: [&dyn ToSql; 1] = [&date];
            query_activities(&conn, &sql, params.as_slice())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn for_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyActivity>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<DailyActivity>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "{ACTIVITY_SELECT} WHERE a.date >= ?1 AND a.date < ?2 ORDER BY a.date ASC"
            );
            let start = start.to_string();
            let end = end.to_string();
            let params: [&dyn ToSql; 2] = [&start, &end];
            query_activities(&conn, &sql, params.as_slice())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DailyActivity>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<DailyActivity>> {
            let conn = db.get_connection()?;
            let sql = format!(
                "{ACTIVITY_SELECT} ORDER BY a.date DESC, a.created_at DESC LIMIT ?1"
            );
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let params: [&dyn ToSql; 1] = [&limit];
            query_activities(&conn, &sql, params.as_slice())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn active_dates(&self) -> Result<Vec<NaiveDate>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<NaiveDate>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(ACTIVE_DATES_SQL).map_err(map_sql_error)?;
            let raw = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            raw.iter().map(|value| parse_date(value)).collect()
        })
        .await
        .map_err(map_join_error)?
    }
}
