//! # LearnArc Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Database implementations (SQLite repositories)
//! - HTTP client with retry support
//! - External service integrations (YouTube Data API, OpenAI)
//! - Metadata cache, OAuth sign-in, reminder scheduling
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `learnarc-core`
//! - Depends on `learnarc-domain` and `learnarc-core`
//! - Contains all "impure" code (I/O, network, clock)

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod scheduling;

// Re-export commonly used items
pub use auth::{OAuthManager, SessionManager};
pub use cache::MokaMetadataCache;
pub use database::{
    DbManager, SqliteActivityRepository, SqliteNotificationRepository, SqlitePlaylistRepository,
    SqliteProgressRepository, SqliteReminderRepository, SqliteUserRepository,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use integrations::openai::OpenAiCompletionClient;
pub use integrations::youtube::YouTubeClient;
pub use scheduling::{ReminderScheduler, ReminderSchedulerConfig, SchedulerError};
