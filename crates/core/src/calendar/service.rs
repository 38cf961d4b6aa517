//! Calendar service - per-day and per-month activity views

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use learnarc_domain::{DailyActivity, DaySummary, LearnArcError, Result};

use crate::progress::ports::ActivityLedger;

/// Read-side calendar queries against the activity ledger.
pub struct CalendarService {
    ledger: Arc<dyn ActivityLedger>,
}

impl CalendarService {
    pub fn new(ledger: Arc<dyn ActivityLedger>) -> Self {
        Self { ledger }
    }

    /// All activities recorded on a given date.
    pub async fn activities_for(&self, date: NaiveDate) -> Result<Vec<DailyActivity>> {
        self.ledger.for_date(date).await
    }

    /// Most recent activities across all days, newest first.
    pub async fn recent(&self, limit: usize) -> Result<Vec<DailyActivity>> {
        self.ledger.recent(limit).await
    }

    /// Per-day aggregates for a calendar month. Days without activity are
    /// omitted.
    pub async fn month_summary(&self, year: i32, month: u32) -> Result<Vec<DaySummary>> {
        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            LearnArcError::InvalidInput(format!("{year}-{month} is not a calendar month"))
        })?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| LearnArcError::Internal("month arithmetic overflow".into()))?;

        let activities = self.ledger.for_range(start, end).await?;

        let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
        for activity in activities {
            let entry = days.entry(activity.date).or_insert_with(|| DaySummary {
                date: activity.date,
                total_watch_secs: 0.0,
                video_count: 0,
                completed_count: 0,
            });
            entry.total_watch_secs += activity.watch_secs;
            entry.video_count += 1;
            if activity.completed {
                entry.completed_count += 1;
            }
        }

        Ok(days.into_values().collect())
    }
}
