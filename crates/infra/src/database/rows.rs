//! Row-mapping helpers shared by the repositories.

use chrono::{DateTime, NaiveDate, Utc};
use learnarc_domain::{LearnArcError, Result, Video};
use rusqlite::{Connection, Row, ToSql};
use uuid::Uuid;

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn int_to_bool(value: i64) -> bool {
    value != 0
}

/// Decode a unix timestamp column; out-of-range values clamp to the epoch.
pub(crate) fn datetime_from_ts(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|err| LearnArcError::Database(format!("invalid uuid in database: {err}")))
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|err| LearnArcError::Database(format!("invalid date in database: {err}")))
}

pub(crate) const UPSERT_VIDEO_SQL: &str = "INSERT OR REPLACE INTO videos (
        id, title, channel_title, thumbnail, description, published_at, duration
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Video columns in the order every query selects them.
pub(crate) const VIDEO_COLUMNS: &str =
    "v.id, v.title, v.channel_title, v.thumbnail, v.description, v.published_at, v.duration";

pub(crate) fn upsert_video(conn: &Connection, video: &Video) -> rusqlite::Result<()> {
    let params: [&dyn ToSql; 7] = [
        &video.id,
        &video.title,
        &video.channel_title,
        &video.thumbnail,
        &video.description,
        &video.published_at.timestamp(),
        &video.duration,
    ];
    conn.execute(UPSERT_VIDEO_SQL, params.as_slice())?;
    Ok(())
}

/// Map the video columns starting at `offset` within a row.
pub(crate) fn map_video_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Video> {
    Ok(Video {
        id: row.get(offset)?,
        title: row.get(offset + 1)?,
        channel_title: row.get(offset + 2)?,
        thumbnail: row.get(offset + 3)?,
        description: row.get(offset + 4)?,
        published_at: datetime_from_ts(row.get(offset + 5)?),
        duration: row.get(offset + 6)?,
    })
}
