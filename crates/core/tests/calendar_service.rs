//! Calendar service tests: day filtering and month aggregation.

mod support;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use learnarc_core::progress::ports::ActivityLedger;
use learnarc_core::CalendarService;
use learnarc_domain::{DailyActivity, LearnArcError};
use support::{video, MemoryActivityLedger};
use uuid::Uuid;

fn activity(video_id: &str, date: NaiveDate, watch_secs: f64, completed: bool) -> DailyActivity {
    DailyActivity {
        id: Uuid::new_v4(),
        video_id: video_id.to_string(),
        video: video(video_id),
        date,
        watch_secs,
        completed,
        created_at: Utc::now(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn activities_for_date_filters_exactly() {
    let ledger = Arc::new(MemoryActivityLedger::default());
    ledger.upsert(activity("a", date(2024, 5, 10), 30.0, false)).await.unwrap();
    ledger.upsert(activity("b", date(2024, 5, 11), 40.0, true)).await.unwrap();

    let service = CalendarService::new(ledger);
    let day = service.activities_for(date(2024, 5, 10)).await.unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].video_id, "a");
}

#[tokio::test]
async fn month_summary_aggregates_per_day() {
    let ledger = Arc::new(MemoryActivityLedger::default());
    ledger.upsert(activity("a", date(2024, 5, 10), 30.0, true)).await.unwrap();
    ledger.upsert(activity("b", date(2024, 5, 10), 70.0, false)).await.unwrap();
    ledger.upsert(activity("c", date(2024, 5, 20), 15.0, false)).await.unwrap();
    // Outside the month: excluded.
    ledger.upsert(activity("d", date(2024, 6, 1), 99.0, true)).await.unwrap();

    let service = CalendarService::new(ledger);
    let summary = service.month_summary(2024, 5).await.unwrap();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].date, date(2024, 5, 10));
    assert_eq!(summary[0].total_watch_secs, 100.0);
    assert_eq!(summary[0].video_count, 2);
    assert_eq!(summary[0].completed_count, 1);
    assert_eq!(summary[1].date, date(2024, 5, 20));
    assert_eq!(summary[1].video_count, 1);
}

#[tokio::test]
async fn december_rolls_into_next_year() {
    let ledger = Arc::new(MemoryActivityLedger::default());
    ledger.upsert(activity("a", date(2024, 12, 31), 10.0, false)).await.unwrap();
    ledger.upsert(activity("b", date(2025, 1, 1), 10.0, false)).await.unwrap();

    let service = CalendarService::new(ledger);
    let summary = service.month_summary(2024, 12).await.unwrap();
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].date, date(2024, 12, 31));
}

#[tokio::test]
async fn invalid_month_is_rejected() {
    let service = CalendarService::new(Arc::new(MemoryActivityLedger::default()));
    let err = service.month_summary(2024, 13).await.unwrap_err();
    assert!(matches!(err, LearnArcError::InvalidInput(_)));
}
