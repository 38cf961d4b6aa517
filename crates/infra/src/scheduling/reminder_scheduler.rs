//! Reminder scheduler: periodically fires due study reminders.
//!
//! Interval-based loop with lifecycle management. The job converts due
//! reminders into notifications; the scheduler owns only the cadence and
//! cancellation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use learnarc_core::NotificationService;
use learnarc_domain::Result;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::error::{SchedulerError, SchedulerResult};

/// Type alias for the task handle to keep the struct readable.
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Work executed on every scheduler tick.
#[async_trait]
pub trait ReminderJob: Send + Sync {
    /// Fire everything due at `now`; returns how many reminders fired.
    async fn run(&self, now: DateTime<Utc>) -> Result<usize>;
}

#[async_trait]
impl ReminderJob for NotificationService {
    async fn run(&self, now: DateTime<Utc>) -> Result<usize> {
        self.fire_due_reminders(now).await
    }
}

/// Configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// How often due reminders are checked.
    pub poll_interval: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_secs(60) }
    }
}

/// Reminder scheduler with start/stop lifecycle.
pub struct ReminderScheduler {
    job: Arc<dyn ReminderJob>,
    config: ReminderSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl ReminderScheduler {
    pub fn new(job: Arc<dyn ReminderJob>, config: ReminderSchedulerConfig) -> Self {
        Self {
            job,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler. Errors if it is already running.
    pub async fn start(&mut self) -> SchedulerResult<()> {
        {
            let handle = self.task_handle.lock().await;
            if handle.as_ref().is_some_and(|h| !h.is_finished()) {
                return Err(SchedulerError::AlreadyRunning);
            }
        }

        // Fresh token so the scheduler can restart after a stop.
        self.cancellation_token = CancellationToken::new();
        let cancel = self.cancellation_token.clone();
        let job = Arc::clone(&self.job);
        let poll_interval = self.config.poll_interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        match job.run(Utc::now()).await {
                            Ok(0) => {}
                            Ok(fired) => info!(fired, "reminder tick fired notifications"),
                            Err(err) => error!(error = %err, "reminder tick failed"),
                        }
                    }
                }
            }
            info!("reminder scheduler loop exited");
        });

        *self.task_handle.lock().await = Some(handle);
        info!(poll_interval_secs = poll_interval.as_secs(), "reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the loop to exit.
    pub async fn stop(&self) -> SchedulerResult<()> {
        let handle = self.task_handle.lock().await.take().ok_or(SchedulerError::NotRunning)?;
        self.cancellation_token.cancel();
        let _ = handle.await;
        info!("reminder scheduler stopped");
        Ok(())
    }

    /// Whether the loop task is currently alive.
    pub async fn is_running(&self) -> bool {
        self.task_handle.lock().await.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        // The spawned loop observes the token and exits on its own.
        self.cancellation_token.cancel();
    }
}
