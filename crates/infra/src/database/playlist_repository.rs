//! SQLite-backed playlist repository.
//!
//! Playlist video lists are ordered by an explicit position column;
//! re-adding a video removes the old entry and appends at the tail, which
//! gives the dedup-and-move-to-end behaviour the service layer expects.

use std::sync::Arc;

use async_trait::async_trait;
use learnarc_core::playlists::ports::PlaylistRepository;
use learnarc_domain::{Playlist, Result, Video};
use rusqlite::{Connection, OptionalExtension, ToSql};
use tokio::task;
use uuid::Uuid;

use super::manager::{map_join_error, map_sql_error, DbManager};
use super::rows::{datetime_from_ts, map_video_row, parse_uuid, upsert_video, VIDEO_COLUMNS};

/// Playlist persistence.
pub struct SqlitePlaylistRepository {
    db: Arc<DbManager>,
}

impl SqlitePlaylistRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

const INSERT_PLAYLIST_SQL: &str =
    "INSERT INTO playlists (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)";

const SELECT_PLAYLIST_SQL: &str =
    "SELECT id, name, description, created_at FROM playlists WHERE id = ?1";

const SELECT_ALL_PLAYLISTS_SQL: &str =
    "SELECT id, name, description, created_at FROM playlists ORDER BY created_at ASC, id ASC";

const NEXT_POSITION_SQL: &str =
    "SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_videos WHERE playlist_id = ?1";

fn playlist_videos(conn: &Connection, playlist_id: &str) -> Result<Vec<Video>> {
    let sql = format!(
        "SELECT {VIDEO_COLUMNS} FROM playlist_videos pv
         JOIN videos v ON v.id = pv.video_id
         WHERE pv.playlist_id = ?1
         ORDER BY pv.position ASC"
    );
    let mut stmt = conn.prepare(&sql).map_err(map_sql_error)?;
    let result = stmt
        .query_map([playlist_id], |row| map_video_row(row, 0))
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error);
    result
}

fn load_playlist(conn: &Connection, id: Uuid) -> Result<Option<Playlist>> {
    let raw = conn
        .query_row(SELECT_PLAYLIST_SQL, [id.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })
        .optional()
        .map_err(map_sql_error)?;

    let Some((raw_id, name, description, created_at)) = raw else {
        return Ok(None);
    };

    let videos = playlist_videos(conn, &raw_id)?;
    Ok(Some(Playlist {
        id: parse_uuid(&raw_id)?,
        name,
        description,
        videos,
        created_at: datetime_from_ts(created_at),
    }))
}

#[async_trait]
impl PlaylistRepository for SqlitePlaylistRepository {
    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        let db = Arc::clone(&self.db);
        let playlist = playlist.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let id = playlist.id.to_string();
            let params: [&dyn ToSql; 4] = [
                &id,
                &playlist.name,
                &playlist.description,
                &playlist.created_at.timestamp(),
            ];
            conn.execute(INSERT_PLAYLIST_SQL, params.as_slice()).map_err(map_sql_error)?;
            for video in &playlist.videos {
                put_video_tx(&conn, &id, video)?;
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_meta(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            let raw_id = id.to_string();
            if let Some(name) = name {
                conn.execute(
                    "UPDATE playlists SET name = ?1 WHERE id = ?2",
                    rusqlite::params![name, raw_id],
                )
                .map_err(map_sql_error)?;
            }
            if let Some(description) = description {
                conn.execute(
                    "UPDATE playlists SET description = ?1 WHERE id = ?2",
                    rusqlite::params![description, raw_id],
                )
                .map_err(map_sql_error)?;
            }
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM playlists WHERE id = ?1", [id.to_string()])
                .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn get(&self, id: Uuid) -> Result<Option<Playlist>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Option<Playlist>> {
            let conn = db.get_connection()?;
            load_playlist(&conn, id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list(&self) -> Result<Vec<Playlist>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Playlist>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(SELECT_ALL_PLAYLISTS_SQL).map_err(map_sql_error)?;
            let raw = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                })
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            let mut playlists = Vec::with_capacity(raw.len());
            for (raw_id, name, description, created_at) in raw {
                let videos = playlist_videos(&conn, &raw_id)?;
                playlists.push(Playlist {
                    id: parse_uuid(&raw_id)?,
                    name,
                    description,
                    videos,
                    created_at: datetime_from_ts(created_at),
                });
            }
            Ok(playlists)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn put_video(&self, playlist_id: Uuid, video: &Video) -> Result<()> {
        let db = Arc::clone(&self.db);
        let video = video.clone();
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            put_video_tx(&conn, &playlist_id.to_string(), &video)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: &str) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let video_id = video_id.to_string();
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            let removed = conn
                .execute(
                    "DELETE FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2",
                    [playlist_id.to_string(), video_id],
                )
                .map_err(map_sql_error)?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn put_video_tx(conn: &Connection, playlist_id: &str, video: &Video) -> Result<()> {
    upsert_video(conn, video).map_err(map_sql_error)?;
    conn.execute(
        "DELETE FROM playlist_videos WHERE playlist_id = ?1 AND video_id = ?2",
        [playlist_id, video.id.as_str()],
    )
    .map_err(map_sql_error)?;
    let position: i64 = conn
        .query_row(NEXT_POSITION_SQL, [playlist_id], |row| row.get(0))
        .map_err(map_sql_error)?;
    conn.execute(
        "INSERT INTO playlist_videos (playlist_id, video_id, position) VALUES (?1, ?2, ?3)",
        rusqlite::params![playlist_id, video.id, position],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (SqlitePlaylistRepository, TempDir) {
        let temp_dir = TempDir::new().expect("tempdir created");
        let db_path = temp_dir.path().join("learnarc.db");
        let manager = Arc::new(DbManager::new(&db_path, 4).expect("db manager created"));
        manager.run_migrations().expect("migrations run");
        (SqlitePlaylistRepository::new(manager), temp_dir)
    }

    fn video(id: &str) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            channel_title: "Channel".into(),
            thumbnail: String::new(),
            description: String::new(),
            published_at: Utc::now(),
            duration: Some("3:45".into()),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_and_fetch_round_trip() {
        let (repo, _tmp) = setup();
        let playlist = Playlist::new("Rust", "basics");

        repo.insert(&playlist).await.expect("insert");
        let fetched = repo.get(playlist.id).await.expect("get").expect("present");

        assert_eq!(fetched.id, playlist.id);
        assert_eq!(fetched.name, "Rust");
        assert!(fetched.videos.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn videos_keep_insertion_order_and_dedup() {
        let (repo, _tmp) = setup();
        let playlist = Playlist::new("Rust", "");
        repo.insert(&playlist).await.expect("insert");

        repo.put_video(playlist.id, &video("a")).await.expect("a");
        repo.put_video(playlist.id, &video("b")).await.expect("b");
        repo.put_video(playlist.id, &video("a")).await.expect("a again");

        let fetched = repo.get(playlist.id).await.expect("get").expect("present");
        let ids: Vec<&str> = fetched.videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn remove_video_reports_presence() {
        let (repo, _tmp) = setup();
        let playlist = Playlist::new("Rust", "");
        repo.insert(&playlist).await.expect("insert");
        repo.put_video(playlist.id, &video("a")).await.expect("a");

        assert!(repo.remove_video(playlist.id, "a").await.expect("remove"));
        assert!(!repo.remove_video(playlist.id, "a").await.expect("remove again"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_cascades_to_video_entries() {
        let (repo, _tmp) = setup();
        let playlist = Playlist::new("Rust", "");
        repo.insert(&playlist).await.expect("insert");
        repo.put_video(playlist.id, &video("a")).await.expect("a");

        repo.delete(playlist.id).await.expect("delete");
        assert!(repo.get(playlist.id).await.expect("get").is_none());
        assert!(repo.list().await.expect("list").is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_meta_is_partial() {
        let (repo, _tmp) = setup();
        let playlist = Playlist::new("Rust", "old");
        repo.insert(&playlist).await.expect("insert");

        repo.update_meta(playlist.id, None, Some("new".into())).await.expect("update");
        let fetched = repo.get(playlist.id).await.expect("get").expect("present");
        assert_eq!(fetched.name, "Rust");
        assert_eq!(fetched.description, "new");
    }
}
