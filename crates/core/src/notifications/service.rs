//! Notification and reminder service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use learnarc_domain::{
    Notification, NotificationKind, NotificationSettings, Reminder, Result,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::ports::{NotificationQueue, NotificationSettingsStore, ReminderStore};

/// Notification center: queue access, settings, and reminder firing.
pub struct NotificationService {
    queue: Arc<dyn NotificationQueue>,
    settings: Arc<dyn NotificationSettingsStore>,
    reminders: Arc<dyn ReminderStore>,
}

impl NotificationService {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        settings: Arc<dyn NotificationSettingsStore>,
        reminders: Arc<dyn ReminderStore>,
    ) -> Self {
        Self { queue, settings, reminders }
    }

    pub async fn list(&self, unread_only: bool) -> Result<Vec<Notification>> {
        self.queue.list(unread_only).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<()> {
        self.queue.mark_read(id).await
    }

    pub async fn settings(&self) -> Result<NotificationSettings> {
        self.settings.get().await
    }

    pub async fn update_settings(&self, settings: NotificationSettings) -> Result<NotificationSettings> {
        self.settings.put(&settings).await?;
        Ok(settings)
    }

    pub async fn add_reminder(&self, reminder: Reminder) -> Result<Reminder> {
        self.reminders.add(reminder.clone()).await?;
        info!(reminder_id = %reminder.id, scheduled_for = %reminder.scheduled_for, "reminder scheduled");
        Ok(reminder)
    }

    pub async fn pending_reminders(&self) -> Result<Vec<Reminder>> {
        self.reminders.pending().await
    }

    /// Convert due reminders into `reminder` notifications and mark them
    /// fired. Returns the number fired.
    ///
    /// A reminder becomes due `reminder_lead_minutes` before its scheduled
    /// time. When notifications are disabled entirely, due reminders are
    /// still marked fired so they do not pile up and fire late.
    pub async fn fire_due_reminders(&self, now: DateTime<Utc>) -> Result<usize> {
        let settings = self.settings.get().await?;
        let due = self.reminders.due(now, settings.reminder_lead_minutes).await?;
        if due.is_empty() {
            return Ok(0);
        }

        let mut fired = 0usize;
        for reminder in due {
            if settings.enabled {
                let mut notification = Notification::now(
                    NotificationKind::Reminder,
                    "⏰ Learning Reminder",
                    format!("Time for: {}", reminder.title),
                );
                notification.scheduled_for = reminder.scheduled_for;
                if let Some(video_id) = &reminder.video_id {
                    notification = notification.with_video(video_id);
                }
                self.queue.push(notification).await?;
            } else {
                debug!(reminder_id = %reminder.id, "notifications disabled, dropping reminder");
            }
            self.reminders.mark_fired(reminder.id).await?;
            fired += 1;
        }

        info!(fired, "fired due reminders");
        Ok(fired)
    }
}
