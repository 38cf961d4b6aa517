//! Video metadata caching with TTL.
//!
//! Fronts the catalog provider so detail lookups within the TTL never hit
//! the network. Entries past the TTL behave as misses; the default TTL is
//! 24 hours.

use std::time::Duration;

use learnarc_core::catalog::ports::MetadataCache;
use learnarc_domain::constants::METADATA_CACHE_TTL_SECS;
use learnarc_domain::Video;
use moka::sync::Cache;

/// Default TTL for cached video metadata (24 hours).
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(METADATA_CACHE_TTL_SECS);

const MAX_CACHED_VIDEOS: u64 = 4096;

/// Thread-safe metadata cache with TTL-based eviction.
#[derive(Clone)]
pub struct MokaMetadataCache {
    cache: Cache<String, Video>,
}

impl MokaMetadataCache {
    /// Create a new cache with the specified TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(MAX_CACHED_VIDEOS)
                .build(),
        }
    }

    /// Create a new cache with the default 24 hour TTL.
    #[must_use]
    pub fn default_ttl() -> Self {
        Self::new(DEFAULT_METADATA_TTL)
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Number of live entries. Triggers eviction of expired entries.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Default for MokaMetadataCache {
    fn default() -> Self {
        Self::default_ttl()
    }
}

impl MetadataCache for MokaMetadataCache {
    fn get(&self, video_id: &str) -> Option<Video> {
        self.cache.get(video_id)
    }

    fn put(&self, video: &Video) {
        self.cache.insert(video.id.clone(), video.clone());
    }

    fn invalidate(&self, video_id: &str) {
        self.cache.invalidate(video_id);
    }
}
