//! Port interfaces for the video catalog provider and its metadata cache

use async_trait::async_trait;
use learnarc_domain::{Result, Video};

/// Trait for the external video catalog (search and detail lookup)
#[async_trait]
pub trait VideoCatalog: Send + Sync {
    /// Keyword search; at most a provider page of results
    async fn search(&self, query: &str) -> Result<Vec<Video>>;

    /// Fetch one video by id; `None` when the provider has no such video
    async fn video(&self, id: &str) -> Result<Option<Video>>;
}

/// Trait for the TTL-bounded video metadata cache.
///
/// Entries past their TTL behave as misses. The cache is synchronous; the
/// backing implementation must be cheap and lock-free enough to call from
/// async contexts.
pub trait MetadataCache: Send + Sync {
    fn get(&self, video_id: &str) -> Option<Video>;

    fn put(&self, video: &Video);

    fn invalidate(&self, video_id: &str);
}
