//! SQLite-backed progress and stats repositories.
//!
//! Implements the async `ProgressRepository` port and the single-row
//! `StatsStore` port. All queries run on the shared pool via
//! `spawn_blocking`.

use std::sync::Arc;

use async_trait::async_trait;
use learnarc_core::progress::ports::{ProgressRepository, StatsStore};
use learnarc_domain::{Result, UserStats, VideoProgress};
use rusqlite::{Connection, OptionalExtension, Row, ToSql};
use tokio::task;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{bool_to_int, datetime_from_ts, int_to_bool};

/// Progress and aggregate-stats persistence.
pub struct SqliteProgressRepository {
    db: Arc<DbManager>,
}

impl SqliteProgressRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

const UPSERT_PROGRESS_SQL: &str = "INSERT OR REPLACE INTO video_progress (
        video_id, position_secs, duration_secs, completed, last_watched
    ) VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_PROGRESS_SQL: &str = "SELECT video_id, position_secs, duration_secs, completed,
        last_watched
    FROM video_progress WHERE video_id = ?1";

const SELECT_ALL_PROGRESS_SQL: &str = "SELECT video_id, position_secs, duration_secs, completed,
        last_watched
    FROM video_progress ORDER BY last_watched DESC";

const SELECT_STATS_SQL: &str = "SELECT total_watch_secs, completed_videos, current_streak,
        longest_streak
    FROM user_stats WHERE id = 1";

const UPSERT_STATS_SQL: &str = "INSERT OR REPLACE INTO user_stats (
        id, total_watch_secs, completed_videos, current_streak, longest_streak
    ) VALUES (1, ?1, ?2, ?3, ?4)";

fn map_progress_row(row: &Row<'_>) -> rusqlite::Result<VideoProgress> {
    Ok(VideoProgress {
        video_id: row.get(0)?,
        position_secs: row.get(1)?,
        duration_secs: row.get(2)?,
        completed: int_to_bool(row.get(3)?),
        last_watched: datetime_from_ts(row.get(4)?),
    })
}

fn select_progress(conn: &Connection, video_id: &str) -> rusqlite::Result<Option<VideoProgress>> {
    conn.query_row(SELECT_PROGRESS_SQL, [video_id], map_progress_row).optional()
}

#[async_trait]
impl ProgressRepository for SqliteProgressRepository {
    async fn get(&self, video_id: &str) -> Result<Option<VideoProgress>> {
        let db = Arc::clone(&self.db);
        let video_id = video_id.to_string();
        task::spawn_blocking(move || -> Result<Option<VideoProgress>> {
            let conn = db.get_connection()?;
            select_progress(&conn, &video_id).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn upsert(&self, progress: VideoProgress) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 5] = [
                &progress.video_id,
                &progress.position_secs,
                &progress.duration_secs,
                &bool_to_int(progress.completed),
                &progress.last_watched.timestamp(),
            ];
            conn.execute(UPSERT_PROGRESS_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn all(&self) -> Result<Vec<VideoProgress>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<VideoProgress>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(SELECT_ALL_PROGRESS_SQL).map_err(map_sql_error)?;
            let rows = stmt
                .query_map([], map_progress_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl StatsStore for SqliteProgressRepository {
    async fn get(&self) -> Result<UserStats> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<UserStats> {
            let conn = db.get_connection()?;
            let stats = conn
                .query_row(SELECT_STATS_SQL, [], |row| {
                    Ok(UserStats {
                        total_watch_secs: row.get(0)?,
                        completed_videos: row.get::<_, i64>(1)? as u32,
                        current_streak: row.get::<_, i64>(2)? as u32,
                        longest_streak: row.get::<_, i64>(3)? as u32,
                    })
                })
                .optional()
                .map_err(map_sql_error)?;
            Ok(stats.unwrap_or_default())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn put(&self, stats: &UserStats) -> Result<()> {
        let db = Arc::clone(&self.db);
        let stats = stats.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let params: [&dyn ToSql; 4] = [
                &stats.total_watch_secs,
                &i64::from(stats.completed_videos),
                &i64::from(stats.current_streak),
                &i64::from(stats.longest_streak),
            ];
            conn.execute(UPSERT_STATS_SQL, params.as_slice()).map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqliteProgressRepository, TempDir) {
        let temp_dir = TempDir::new().expect("tempdir created");
        let db_path = temp_dir.path().join("learnarc.db");
        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");
        (SqliteProgressRepository::new(manager), temp_dir)
    }

    fn progress(video_id: &str, position: f64) -> VideoProgress {
        VideoProgress {
            video_id: video_id.to_string(),
            position_secs: position,
            duration_secs: 600.0,
            completed: false,
            last_watched: Utc::now(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn upsert_overwrites_previous_record() {
        let (repo, _tmp) = setup();

        repo.upsert(progress("abc", 30.0)).await.expect("first upsert");
        repo.upsert(progress("abc", 90.0)).await.expect("second upsert");

        let stored =
            ProgressRepository::get(&repo, "abc").await.expect("get").expect("record present");
        assert_eq!(stored.position_secs, 90.0);

        let all = repo.all().await.expect("all");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_video_returns_none() {
        let (repo, _tmp) = setup();
        assert!(ProgressRepository::get(&repo, "missing").await.expect("get").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stats_default_until_first_put() {
        let (repo, _tmp) = setup();

        let stats = StatsStore::get(&repo).await.expect("get stats");
        assert_eq!(stats, UserStats::default());

        let updated = UserStats {
            total_watch_secs: 120.5,
            completed_videos: 2,
            current_streak: 3,
            longest_streak: 4,
        };
        repo.put(&updated).await.expect("put stats");
        assert_eq!(StatsStore::get(&repo).await.expect("get stats"), updated);
    }
}
