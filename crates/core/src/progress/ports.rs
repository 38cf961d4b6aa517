//! Port interfaces for progress bookkeeping
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use learnarc_domain::{DailyActivity, Result, UserStats, VideoProgress};

/// Trait for persisting per-video playback progress
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the stored progress for a video, if any
    async fn get(&self, video_id: &str) -> Result<Option<VideoProgress>>;

    /// Insert or overwrite the progress record for a video
    async fn upsert(&self, progress: VideoProgress) -> Result<()>;

    /// All stored progress records
    async fn all(&self) -> Result<Vec<VideoProgress>>;
}

/// Trait for the per-day, per-video activity ledger
#[async_trait]
pub trait ActivityLedger: Send + Sync {
    /// Insert or overwrite the record keyed by (video id, date)
    async fn upsert(&self, activity: DailyActivity) -> Result<()>;

    /// Fetch a single day's record for a video, if any
    async fn find(&self, video_id: &str, date: NaiveDate) -> Result<Option<DailyActivity>>;

    /// All activities recorded on the given date
    async fn for_date(&self, date: NaiveDate) -> Result<Vec<DailyActivity>>;

    /// Activities within `[start, end)`, ordered by date
    async fn for_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyActivity>>;

    /// Most recent activities, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<DailyActivity>>;

    /// Distinct dates with at least one activity, ascending
    async fn active_dates(&self) -> Result<Vec<NaiveDate>>;
}

/// Trait for the single aggregate statistics row
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Current aggregate statistics (defaults when nothing recorded yet)
    async fn get(&self) -> Result<UserStats>;

    /// Replace the aggregate statistics
    async fn put(&self, stats: &UserStats) -> Result<()>;
}
