//! YouTube Data API v3 integration
//!
//! Implements the core `VideoCatalog` port: keyword search plus a detail
//! lookup, with durations resolved through the `videos` endpoint and
//! rendered human-readable.

mod client;
mod types;

pub use client::YouTubeClient;
pub use types::{format_duration, player_error_message};
