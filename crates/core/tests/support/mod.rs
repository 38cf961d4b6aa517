#![allow(dead_code)]
//! In-memory port fakes shared by the core service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use learnarc_core::assistant::ports::{CompletionClient, CompletionReply, CompletionRequest};
use learnarc_core::catalog::ports::{MetadataCache, VideoCatalog};
use learnarc_core::notifications::ports::{
    NotificationQueue, NotificationSettingsStore, ReminderStore,
};
use learnarc_core::playlists::ports::PlaylistRepository;
use learnarc_core::progress::ports::{ActivityLedger, ProgressRepository, StatsStore};
use learnarc_domain::{
    DailyActivity, LearnArcError, Notification, NotificationSettings, Playlist, Reminder, Result,
    UserStats, Video, VideoProgress,
};
use parking_lot::Mutex;
use uuid::Uuid;

/// Build a minimal catalog video for tests.
pub fn video(id: &str) -> Video {
    Video {
        id: id.to_string(),
        title: format!("Video {id}"),
        channel_title: "Test Channel".to_string(),
        thumbnail: format!("https://img.example/{id}.jpg"),
        description: String::new(),
        published_at: Utc::now(),
        duration: Some("10:00".to_string()),
    }
}

#[derive(Default)]
pub struct MemoryProgressRepository {
    records: Mutex<HashMap<String, VideoProgress>>,
}

#[async_trait]
impl ProgressRepository for MemoryProgressRepository {
    async fn get(&self, video_id: &str) -> Result<Option<VideoProgress>> {
        Ok(self.records.lock().get(video_id).cloned())
    }

    async fn upsert(&self, progress: VideoProgress) -> Result<()> {
        self.records.lock().insert(progress.video_id.clone(), progress);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<VideoProgress>> {
        Ok(self.records.lock().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryActivityLedger {
    records: Mutex<Vec<DailyActivity>>,
}

#[async_trait]
impl ActivityLedger for MemoryActivityLedger {
    async fn upsert(&self, activity: DailyActivity) -> Result<()> {
        let mut records = self.records.lock();
        records.retain(|a| !(a.video_id == activity.video_id && a.date == activity.date));
        records.push(activity);
        Ok(())
    }

    async fn find(&self, video_id: &str, date: NaiveDate) -> Result<Option<DailyActivity>> {
        Ok(self
            .records
            .lock()
            .iter()
            .find(|a| a.video_id == video_id && a.date == date)
            .cloned())
    }

    async fn for_date(&self, date: NaiveDate) -> Result<Vec<DailyActivity>> {
        Ok(self.records.lock().iter().filter(|a| a.date == date).cloned().collect())
    }

    async fn for_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyActivity>> {
        let mut matching: Vec<DailyActivity> = self
            .records
            .lock()
            .iter()
            .filter(|a| a.date >= start && a.date < end)
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.date);
        Ok(matching)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<DailyActivity>> {
        let mut records = self.records.lock().clone();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.truncate(limit);
        Ok(records)
    }

    async fn active_dates(&self) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self.records.lock().iter().map(|a| a.date).collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }
}

#[derive(Default)]
pub struct MemoryStatsStore {
    stats: Mutex<UserStats>,
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn get(&self) -> Result<UserStats> {
        Ok(self.stats.lock().clone())
    }

    async fn put(&self, stats: &UserStats) -> Result<()> {
        *self.stats.lock() = stats.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryNotificationQueue {
    items: Mutex<Vec<Notification>>,
}

impl MemoryNotificationQueue {
    pub fn snapshot(&self) -> Vec<Notification> {
        self.items.lock().clone()
    }
}

#[async_trait]
impl NotificationQueue for MemoryNotificationQueue {
    async fn push(&self, notification: Notification) -> Result<()> {
        self.items.lock().push(notification);
        Ok(())
    }

    async fn list(&self, unread_only: bool) -> Result<Vec<Notification>> {
        let mut items: Vec<Notification> =
            self.items.lock().iter().filter(|n| !unread_only || !n.read).cloned().collect();
        items.reverse();
        Ok(items)
    }

    async fn mark_read(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| LearnArcError::NotFound(format!("notification {id}")))?;
        item.read = true;
        Ok(())
    }
}

pub struct MemorySettingsStore {
    settings: Mutex<NotificationSettings>,
}

impl Default for MemorySettingsStore {
    fn default() -> Self {
        Self { settings: Mutex::new(NotificationSettings::default()) }
    }
}

impl MemorySettingsStore {
    pub fn with(settings: NotificationSettings) -> Self {
        Self { settings: Mutex::new(settings) }
    }
}

#[async_trait]
impl NotificationSettingsStore for MemorySettingsStore {
    async fn get(&self) -> Result<NotificationSettings> {
        Ok(self.settings.lock().clone())
    }

    async fn put(&self, settings: &NotificationSettings) -> Result<()> {
        *self.settings.lock() = settings.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryReminderStore {
    items: Mutex<Vec<Reminder>>,
}

#[async_trait]
impl ReminderStore for MemoryReminderStore {
    async fn add(&self, reminder: Reminder) -> Result<()> {
        self.items.lock().push(reminder);
        Ok(())
    }

    async fn pending(&self) -> Result<Vec<Reminder>> {
        let mut pending: Vec<Reminder> =
            self.items.lock().iter().filter(|r| !r.fired).cloned().collect();
        pending.sort_by_key(|r| r.scheduled_for);
        Ok(pending)
    }

    async fn due(&self, now: DateTime<Utc>, lead_minutes: u32) -> Result<Vec<Reminder>> {
        let lead = Duration::minutes(i64::from(lead_minutes));
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|r| !r.fired && r.scheduled_for - lead <= now)
            .cloned()
            .collect())
    }

    async fn mark_fired(&self, id: Uuid) -> Result<()> {
        let mut items = self.items.lock();
        let item = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LearnArcError::NotFound(format!("reminder {id}")))?;
        item.fired = true;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPlaylistRepository {
    items: Mutex<Vec<Playlist>>,
}

#[async_trait]
impl PlaylistRepository for MemoryPlaylistRepository {
    async fn insert(&self, playlist: &Playlist) -> Result<()> {
        self.items.lock().push(playlist.clone());
        Ok(())
    }

    async fn update_meta(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<()> {
        let mut items = self.items.lock();
        let playlist = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| LearnArcError::NotFound(format!("playlist {id}")))?;
        if let Some(name) = name {
            playlist.name = name;
        }
        if let Some(description) = description {
            playlist.description = description;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.items.lock().retain(|p| p.id != id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Playlist>> {
        Ok(self.items.lock().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Playlist>> {
        Ok(self.items.lock().clone())
    }

    async fn put_video(&self, playlist_id: Uuid, video: &Video) -> Result<()> {
        let mut items = self.items.lock();
        let playlist = items
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| LearnArcError::NotFound(format!("playlist {playlist_id}")))?;
        playlist.add_video(video.clone());
        Ok(())
    }

    async fn remove_video(&self, playlist_id: Uuid, video_id: &str) -> Result<bool> {
        let mut items = self.items.lock();
        let playlist = items
            .iter_mut()
            .find(|p| p.id == playlist_id)
            .ok_or_else(|| LearnArcError::NotFound(format!("playlist {playlist_id}")))?;
        Ok(playlist.remove_video(video_id))
    }
}

/// Scripted catalog with call counting for cache tests.
#[derive(Default)]
pub struct ScriptedCatalog {
    videos: Mutex<HashMap<String, Video>>,
    pub fetch_calls: Mutex<u32>,
}

impl ScriptedCatalog {
    pub fn with_videos(videos: Vec<Video>) -> Self {
        let map = videos.into_iter().map(|v| (v.id.clone(), v)).collect();
        Self { videos: Mutex::new(map), fetch_calls: Mutex::new(0) }
    }
}

#[async_trait]
impl VideoCatalog for ScriptedCatalog {
    async fn search(&self, query: &str) -> Result<Vec<Video>> {
        let lower = query.to_lowercase();
        Ok(self
            .videos
            .lock()
            .values()
            .filter(|v| v.title.to_lowercase().contains(&lower))
            .cloned()
            .collect())
    }

    async fn video(&self, id: &str) -> Result<Option<Video>> {
        *self.fetch_calls.lock() += 1;
        Ok(self.videos.lock().get(id).cloned())
    }
}

/// Plain map-backed cache with no expiry, plus an explicit `expire` hook so
/// tests can simulate TTL lapse.
#[derive(Default)]
pub struct MapCache {
    entries: Mutex<HashMap<String, Video>>,
}

impl MapCache {
    pub fn expire_all(&self) {
        self.entries.lock().clear();
    }
}

impl MetadataCache for MapCache {
    fn get(&self, video_id: &str) -> Option<Video> {
        self.entries.lock().get(video_id).cloned()
    }

    fn put(&self, video: &Video) {
        self.entries.lock().insert(video.id.clone(), video.clone());
    }

    fn invalidate(&self, video_id: &str) {
        self.entries.lock().remove(video_id);
    }
}

/// Completion client that records requests and replies with a canned body.
pub struct ScriptedCompletionClient {
    pub reply: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedCompletionClient {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: reply.to_string(), requests: Mutex::new(Vec::new()) })
    }

    pub fn last_request(&self) -> CompletionRequest {
        self.requests.lock().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionReply> {
        self.requests.lock().push(request);
        Ok(CompletionReply { content: self.reply.clone(), total_tokens: 42 })
    }
}
