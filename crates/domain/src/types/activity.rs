//! Daily activity ledger types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::video::Video;

/// A per-day, per-video summary record.
///
/// Exactly one record exists per (video id, date); a later report on the
/// same day overwrites position and completion while preserving
/// `created_at`. Drives the calendar view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub id: Uuid,
    pub video_id: String,
    pub video: Video,
    pub date: NaiveDate,
    /// Seconds of the video reached on this day (last reported position).
    pub watch_secs: f64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Aggregated totals for one calendar day, used by the month view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_watch_secs: f64,
    pub video_count: u32,
    pub completed_count: u32,
}
