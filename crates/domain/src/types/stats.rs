//! Aggregate user statistics

use serde::{Deserialize, Serialize};

/// Running totals derived from progress reports.
///
/// Streak counters are recomputed from the daily activity ledger on every
/// report rather than mutated incrementally, so they cannot drift from
/// history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Total credited watch time in seconds.
    pub total_watch_secs: f64,
    /// Number of videos that have crossed the completion threshold,
    /// counted once per video.
    pub completed_videos: u32,
    /// Consecutive days (ending today) with at least one activity.
    pub current_streak: u32,
    /// Longest consecutive-day run on record.
    pub longest_streak: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = UserStats::default();
        assert_eq!(stats.total_watch_secs, 0.0);
        assert_eq!(stats.completed_videos, 0);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 0);
    }

    #[test]
    fn stats_round_trip_camel_case() {
        let stats = UserStats {
            total_watch_secs: 123.5,
            completed_videos: 4,
            current_streak: 2,
            longest_streak: 7,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("totalWatchSecs"));
        let back: UserStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
