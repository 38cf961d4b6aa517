//! Port interface for playlist persistence

use async_trait::async_trait;
use learnarc_domain::{Playlist, Result, Video};
use uuid::Uuid;

/// Trait for persisting playlists and their ordered video lists
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Insert a new playlist
    async fn insert(&self, playlist: &Playlist) -> Result<()>;

    /// Update name and/or description; `None` leaves the field unchanged
    async fn update_meta(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<()>;

    /// Delete a playlist and its video entries
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Fetch a playlist with its ordered videos
    async fn get(&self, id: Uuid) -> Result<Option<Playlist>>;

    /// All playlists ordered by creation time
    async fn list(&self) -> Result<Vec<Playlist>>;

    /// Add a video to a playlist, deduplicating by video id (an existing
    /// entry moves to the end of the order)
    async fn put_video(&self, playlist_id: Uuid, video: &Video) -> Result<()>;

    /// Remove a video from a playlist; returns whether an entry was removed
    async fn remove_video(&self, playlist_id: Uuid, video_id: &str) -> Result<bool>;
}
