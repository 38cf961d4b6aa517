//! Playlist types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::video::Video;

/// A user-owned, ordered collection of videos.
///
/// Videos are deduplicated by id: re-adding a video that is already present
/// replaces the stored copy and moves it to the end of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub videos: Vec<Video>,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    /// Create an empty playlist.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            videos: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a video, deduplicating by id.
    pub fn add_video(&mut self, video: Video) {
        self.videos.retain(|v| v.id != video.id);
        self.videos.push(video);
    }

    /// Remove a video by id. Returns `true` if a video was removed.
    pub fn remove_video(&mut self, video_id: &str) -> bool {
        let before = self.videos.len();
        self.videos.retain(|v| v.id != video_id);
        self.videos.len() != before
    }

    pub fn contains(&self, video_id: &str) -> bool {
        self.videos.iter().any(|v| v.id == video_id)
    }
}
