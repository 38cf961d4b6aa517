//! Port interfaces for notifications and reminders

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnarc_domain::{Notification, NotificationSettings, Reminder, Result};
use uuid::Uuid;

/// Trait for the persisted notification queue
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Append a notification
    async fn push(&self, notification: Notification) -> Result<()>;

    /// List notifications, newest first
    async fn list(&self, unread_only: bool) -> Result<Vec<Notification>>;

    /// Mark a notification as read
    async fn mark_read(&self, id: Uuid) -> Result<()>;
}

/// Trait for the single notification-settings row
#[async_trait]
pub trait NotificationSettingsStore: Send + Sync {
    /// Current settings (defaults when never saved)
    async fn get(&self) -> Result<NotificationSettings>;

    /// Replace the settings
    async fn put(&self, settings: &NotificationSettings) -> Result<()>;
}

/// Trait for persisted study reminders
#[async_trait]
pub trait ReminderStore: Send + Sync {
    /// Persist a new reminder
    async fn add(&self, reminder: Reminder) -> Result<()>;

    /// Reminders that have not fired yet, soonest first
    async fn pending(&self) -> Result<Vec<Reminder>>;

    /// Unfired reminders whose (scheduled time - lead) has passed
    async fn due(&self, now: DateTime<Utc>, lead_minutes: u32) -> Result<Vec<Reminder>>;

    /// Mark a reminder as fired
    async fn mark_fired(&self, id: Uuid) -> Result<()>;
}
