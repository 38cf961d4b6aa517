//! Catalog service - cache-fronted search and detail lookup

use std::sync::Arc;

use learnarc_domain::{LearnArcError, Result, Video};
use tracing::debug;

use super::ports::{MetadataCache, VideoCatalog};

/// Catalog access with a read-through metadata cache.
pub struct CatalogService {
    catalog: Arc<dyn VideoCatalog>,
    cache: Arc<dyn MetadataCache>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn VideoCatalog>, cache: Arc<dyn MetadataCache>) -> Self {
        Self { catalog, cache }
    }

    /// Keyword search. Results prime the metadata cache so a follow-up
    /// detail fetch does not hit the provider again.
    pub async fn search(&self, query: &str) -> Result<Vec<Video>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LearnArcError::InvalidInput("search query must not be empty".into()));
        }
        let videos = self.catalog.search(query).await?;
        for video in &videos {
            self.cache.put(video);
        }
        Ok(videos)
    }

    /// Fetch one video, serving from the cache when the entry is fresh.
    pub async fn video(&self, id: &str) -> Result<Video> {
        if let Some(video) = self.cache.get(id) {
            debug!(video_id = id, "metadata cache hit");
            return Ok(video);
        }

        let video = self
            .catalog
            .video(id)
            .await?
            .ok_or_else(|| LearnArcError::NotFound(format!("video {id}")))?;
        self.cache.put(&video);
        Ok(video)
    }
}
