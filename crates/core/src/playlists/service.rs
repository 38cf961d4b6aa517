//! Playlist service

use std::sync::Arc;

use learnarc_domain::{LearnArcError, Playlist, Result, Video};
use tracing::info;
use uuid::Uuid;

use super::ports::PlaylistRepository;

/// Playlist use cases over the repository port.
pub struct PlaylistService {
    repository: Arc<dyn PlaylistRepository>,
}

impl PlaylistService {
    pub fn new(repository: Arc<dyn PlaylistRepository>) -> Self {
        Self { repository }
    }

    /// Create a playlist with an empty video list. The playlist is visible
    /// in `list()` immediately.
    pub async fn create(&self, name: &str, description: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LearnArcError::InvalidInput("playlist name must not be empty".into()));
        }
        let playlist = Playlist::new(name, description);
        self.repository.insert(&playlist).await?;
        info!(playlist_id = %playlist.id, name, "playlist created");
        Ok(playlist)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Playlist> {
        if let Some(name) = &name {
            if name.trim().is_empty() {
                return Err(LearnArcError::InvalidInput("playlist name must not be empty".into()));
            }
        }
        self.require(id).await?;
        self.repository.update_meta(id, name, description).await?;
        self.require(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.require(id).await?;
        self.repository.delete(id).await?;
        info!(playlist_id = %id, "playlist deleted");
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Result<Playlist> {
        self.require(id).await
    }

    pub async fn list(&self) -> Result<Vec<Playlist>> {
        self.repository.list().await
    }

    /// Add a video, deduplicating by id.
    pub async fn add_video(&self, playlist_id: Uuid, video: Video) -> Result<Playlist> {
        self.require(playlist_id).await?;
        self.repository.put_video(playlist_id, &video).await?;
        self.require(playlist_id).await
    }

    pub async fn remove_video(&self, playlist_id: Uuid, video_id: &str) -> Result<Playlist> {
        self.require(playlist_id).await?;
        let removed = self.repository.remove_video(playlist_id, video_id).await?;
        if !removed {
            return Err(LearnArcError::NotFound(format!(
                "video {video_id} is not in playlist {playlist_id}"
            )));
        }
        self.require(playlist_id).await
    }

    async fn require(&self, id: Uuid) -> Result<Playlist> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| LearnArcError::NotFound(format!("playlist {id}")))
    }
}
