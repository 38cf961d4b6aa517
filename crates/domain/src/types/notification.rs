//! Notification, reminder, and notification-settings types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_DAILY_GOAL, DEFAULT_REMINDER_LEAD_MINUTES};
use crate::impl_domain_tag_conversions;

/// Notification category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Completion,
    Reminder,
    Streak,
    Goal,
}

impl_domain_tag_conversions!(NotificationKind {
    Completion => "completion",
    Reminder => "reminder",
    Streak => "streak",
    Goal => "goal",
});

/// An in-app notification, created as a side effect of stats updates or by
/// the reminder scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub scheduled_for: DateTime<Utc>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create an unread notification scheduled for `now`.
    pub fn now(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        let stamp = Utc::now();
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            message: message.into(),
            video_id: None,
            scheduled_for: stamp,
            read: false,
            created_at: stamp,
        }
    }

    pub fn with_video(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }
}

/// User preferences for notification fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub enabled: bool,
    pub completion_notifications: bool,
    pub daily_goal_reminders: bool,
    /// Minutes before a scheduled reminder at which it becomes due.
    pub reminder_lead_minutes: u32,
    /// Completed videos per day that trigger a goal notification.
    pub daily_goal: u32,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            completion_notifications: true,
            daily_goal_reminders: true,
            reminder_lead_minutes: DEFAULT_REMINDER_LEAD_MINUTES,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

/// A study reminder scheduled for a future time.
///
/// The reminder scheduler converts due reminders into [`Notification`]s of
/// kind [`NotificationKind::Reminder`] and marks them fired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    pub scheduled_for: DateTime<Utc>,
    pub fired: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        scheduled_for: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            video_id: None,
            scheduled_for,
            fired: false,
            created_at: Utc::now(),
        }
    }
}
