//! SQLite persistence layer
//!
//! One repository per aggregate, all sharing the pooled [`DbManager`].
//! Async ports run their queries on `spawn_blocking`.

mod activity_repository;
mod manager;
mod notification_repository;
mod playlist_repository;
mod progress_repository;
mod reminder_repository;
mod rows;
mod user_repository;

pub use activity_repository::SqliteActivityRepository;
pub use manager::{DbConnection, DbManager};
pub use notification_repository::SqliteNotificationRepository;
pub use playlist_repository::SqlitePlaylistRepository;
pub use progress_repository::SqliteProgressRepository;
pub use reminder_repository::SqliteReminderRepository;
pub use user_repository::SqliteUserRepository;
