//! Video catalog and playback-progress types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video as returned by the catalog provider.
///
/// Immutable once fetched; referenced by id from playlists and activity
/// records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub channel_title: String,
    pub thumbnail: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    /// Human-readable duration (`H:MM:SS` or `M:SS`), filled by a details
    /// lookup and absent for search results the provider returned without
    /// content details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Playback progress for a single video.
///
/// One record per video id, overwritten on every progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    pub video_id: String,
    /// Last reported playback position in seconds.
    pub position_secs: f64,
    /// Duration reported alongside the position, in seconds.
    pub duration_secs: f64,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
}

impl VideoProgress {
    /// Fraction of the video watched, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.position_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}
