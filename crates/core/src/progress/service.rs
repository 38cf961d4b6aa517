//! Progress bookkeeping service - core business logic
//!
//! A progress report updates the per-video record, credits watch time,
//! detects the completion transition, upserts the daily activity ledger,
//! recomputes streaks from history, and fans out notifications.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use learnarc_domain::constants::STREAK_NOTIFY_MIN_DAYS;
use learnarc_domain::{
    DailyActivity, LearnArcError, Notification, NotificationKind, Result, UserStats, Video,
    VideoProgress,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use super::ports::{ActivityLedger, ProgressRepository, StatsStore};
use crate::notifications::ports::{NotificationQueue, NotificationSettingsStore};

/// Outcome of a single progress report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub progress: VideoProgress,
    /// True when this report crossed the completion threshold for the
    /// first time.
    pub newly_completed: bool,
    pub stats: UserStats,
}

/// Progress bookkeeping service
pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    ledger: Arc<dyn ActivityLedger>,
    stats: Arc<dyn StatsStore>,
    notifications: Arc<dyn NotificationQueue>,
    settings: Arc<dyn NotificationSettingsStore>,
    completion_threshold: f64,
}

impl ProgressService {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        ledger: Arc<dyn ActivityLedger>,
        stats: Arc<dyn StatsStore>,
        notifications: Arc<dyn NotificationQueue>,
        settings: Arc<dyn NotificationSettingsStore>,
        completion_threshold: f64,
    ) -> Self {
        Self { progress, ledger, stats, notifications, settings, completion_threshold }
    }

    /// Record a playback position report for `video` at the current time.
    pub async fn record(
        &self,
        video: &Video,
        position_secs: f64,
        duration_secs: f64,
    ) -> Result<ProgressUpdate> {
        self.record_at(video, position_secs, duration_secs, Utc::now()).await
    }

    /// Record a playback position report at an explicit timestamp.
    ///
    /// Completion is `position >= threshold * duration`; the completed-video
    /// counter increments only on the transition into completed. Watch-time
    /// credit is the forward position delta; seeking backwards earns zero.
    pub async fn record_at(
        &self,
        video: &Video,
        position_secs: f64,
        duration_secs: f64,
        now: DateTime<Utc>,
    ) -> Result<ProgressUpdate> {
        validate_report(position_secs, duration_secs)?;

        let completed = position_secs >= self.completion_threshold * duration_secs;
        let previous = self.progress.get(&video.id).await?;
        let previous_position = previous.as_ref().map_or(0.0, |p| p.position_secs);
        let was_completed = previous.as_ref().is_some_and(|p| p.completed);
        let newly_completed = completed && !was_completed;

        let progress = VideoProgress {
            video_id: video.id.clone(),
            position_secs,
            duration_secs,
            completed,
            last_watched: now,
        };
        self.progress.upsert(progress.clone()).await?;

        let today = now.date_naive();
        let first_activity_today = self.ledger.for_date(today).await?.is_empty();
        self.upsert_daily_activity(video, &progress, today, now).await?;

        let mut stats = self.stats.get().await?;
        stats.total_watch_secs += (position_secs - previous_position).max(0.0);
        if newly_completed {
            stats.completed_videos += 1;
        }

        let dates = self.ledger.active_dates().await?;
        let (current, longest) = compute_streaks(&dates, today);
        stats.current_streak = current;
        stats.longest_streak = longest;
        self.stats.put(&stats).await?;

        self.fan_out_notifications(video, &stats, newly_completed, first_activity_today, today)
            .await;

        Ok(ProgressUpdate { progress, newly_completed, stats })
    }

    async fn upsert_daily_activity(
        &self,
        video: &Video,
        progress: &VideoProgress,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let existing = self.ledger.find(&video.id, today).await?;
        let activity = DailyActivity {
            id: existing.as_ref().map_or_else(Uuid::new_v4, |a| a.id),
            video_id: video.id.clone(),
            video: video.clone(),
            date: today,
            watch_secs: progress.position_secs,
            completed: progress.completed,
            created_at: existing.as_ref().map_or(now, |a| a.created_at),
        };
        self.ledger.upsert(activity).await
    }

    /// Notification fan-out is best effort: a failed push is logged and
    /// never fails the progress report itself.
    async fn fan_out_notifications(
        &self,
        video: &Video,
        stats: &UserStats,
        newly_completed: bool,
        first_activity_today: bool,
        today: NaiveDate,
    ) {
        let settings = match self.settings.get().await {
            Ok(settings) => settings,
            Err(err) => {
                error!(error = %err, "failed to load notification settings");
                return;
            }
        };
        if !settings.enabled {
            return;
        }

        if newly_completed && settings.completion_notifications {
            let notification = Notification::now(
                NotificationKind::Completion,
                "Video Completed! 🎉",
                format!("You've completed \"{}\"", video.title),
            )
            .with_video(&video.id);
            self.push(notification).await;
        }

        if first_activity_today && stats.current_streak >= STREAK_NOTIFY_MIN_DAYS {
            let notification = Notification::now(
                NotificationKind::Streak,
                "🔥 Streak Achievement!",
                format!("Amazing! You're on a {}-day learning streak!", stats.current_streak),
            );
            self.push(notification).await;
        }

        if newly_completed && settings.daily_goal_reminders && settings.daily_goal > 0 {
            match self.completed_today(today).await {
                Ok(completed_today) if completed_today == settings.daily_goal => {
                    let notification = Notification::now(
                        NotificationKind::Goal,
                        "🎯 Daily Goal Achieved!",
                        format!(
                            "Excellent! You've completed {}/{} videos today!",
                            completed_today, settings.daily_goal
                        ),
                    );
                    self.push(notification).await;
                }
                Ok(_) => {}
                Err(err) => error!(error = %err, "failed to count today's completions"),
            }
        }
    }

    async fn completed_today(&self, today: NaiveDate) -> Result<u32> {
        let activities = self.ledger.for_date(today).await?;
        Ok(activities.iter().filter(|a| a.completed).count() as u32)
    }

    async fn push(&self, notification: Notification) {
        if let Err(err) = self.notifications.push(notification).await {
            error!(error = %err, "failed to enqueue notification");
        }
    }

    /// Stored progress for a single video.
    pub async fn progress_for(&self, video_id: &str) -> Result<Option<VideoProgress>> {
        self.progress.get(video_id).await
    }

    /// Current aggregate statistics.
    pub async fn stats(&self) -> Result<UserStats> {
        self.stats.get().await
    }
}

fn validate_report(position_secs: f64, duration_secs: f64) -> Result<()> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(LearnArcError::InvalidInput(format!(
            "duration must be a positive number of seconds, got {duration_secs}"
        )));
    }
    if !position_secs.is_finite() || position_secs < 0.0 {
        return Err(LearnArcError::InvalidInput(format!(
            "position must be a non-negative number of seconds, got {position_secs}"
        )));
    }
    Ok(())
}

/// Derive (current, longest) streaks from the distinct dates carrying
/// activity.
///
/// The current streak is the consecutive-day run ending today; a run that
/// ended yesterday still counts (the day is not over), anything older does
/// not.
pub fn compute_streaks(dates: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    let set: HashSet<NaiveDate> = dates.iter().copied().collect();

    let mut longest = 0u32;
    for &date in &set {
        let starts_run = date.pred_opt().map_or(true, |prev| !set.contains(&prev));
        if !starts_run {
            continue;
        }
        let mut len = 1u32;
        let mut cursor = date;
        while let Some(next) = cursor.succ_opt() {
            if !set.contains(&next) {
                break;
            }
            cursor = next;
            len += 1;
        }
        longest = longest.max(len);
    }

    let anchor = if set.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| set.contains(yesterday))
    };
    let current = anchor.map_or(0, |anchor| {
        let mut len = 1u32;
        let mut cursor = anchor;
        while let Some(prev) = cursor.pred_opt() {
            if !set.contains(&prev) {
                break;
            }
            cursor = prev;
            len += 1;
        }
        len
    });

    (current, longest)
}
