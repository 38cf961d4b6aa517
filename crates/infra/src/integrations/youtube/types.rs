//! YouTube Data API payload types and helpers.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/* -------------------------------------------------------------------------- */
/* Response payloads */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchItem {
    pub id: SearchItemId,
    pub snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchItemId {
    /// Absent for channel/playlist hits; those rows are skipped.
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Snippet {
    pub title: String,
    pub channel_title: String,
    #[serde(default)]
    pub description: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Thumbnails {
    pub high: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub default: Option<Thumbnail>,
}

impl Thumbnails {
    /// Best available thumbnail URL, preferring the high resolution.
    pub fn best_url(&self) -> String {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .next()
            .map(|thumb| thumb.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoItem {
    pub id: String,
    pub snippet: Option<Snippet>,
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentDetails {
    pub duration: String,
}

/* -------------------------------------------------------------------------- */
/* Duration rendering */
/* -------------------------------------------------------------------------- */

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    let pattern = Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap();
    pattern
});

/// Render an ISO-8601 duration (`PT1H2M3S`) as `H:MM:SS`, or `M:SS` when
/// under an hour. Unparseable input yields `None`.
pub fn format_duration(iso: &str) -> Option<String> {
    let captures = ISO_DURATION.captures(iso)?;
    let part = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    if hours > 0 {
        Some(format!("{hours}:{minutes:02}:{seconds:02}"))
    } else {
        Some(format!("{minutes}:{seconds:02}"))
    }
}

/* -------------------------------------------------------------------------- */
/* Player error codes */
/* -------------------------------------------------------------------------- */

/// Map an embedded-player error code to a human-readable message.
///
/// The code table is fixed by the player API; unknown codes fall back to a
/// generic rendering.
pub fn player_error_message(code: u16) -> String {
    match code {
        2 => "Invalid video ID".to_string(),
        5 => "HTML5 player error".to_string(),
        100 => "Video not found or removed".to_string(),
        101 | 150 => "Video owner blocked embedding".to_string(),
        0 => "Unknown error occurred".to_string(),
        other => format!("Error code {other}"),
    }
}
