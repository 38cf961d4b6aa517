//! # LearnArc Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Use cases and services (progress bookkeeping, playlists, catalog,
//!   calendar, assistant, notifications)
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `learnarc-domain`
//! - No database, HTTP, or provider code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod assistant;
pub mod calendar;
pub mod catalog;
pub mod notifications;
pub mod playlists;
pub mod progress;

// Re-export specific items to avoid ambiguity
pub use assistant::ports::{CompletionClient, CompletionReply, CompletionRequest};
pub use assistant::{AssistantContext, AssistantReply, AssistantService, ReplyKind, SkillLevel};
pub use calendar::CalendarService;
pub use catalog::ports::{MetadataCache, VideoCatalog};
pub use catalog::CatalogService;
pub use notifications::ports::{NotificationQueue, NotificationSettingsStore, ReminderStore};
pub use notifications::NotificationService;
pub use playlists::ports::PlaylistRepository;
pub use playlists::PlaylistService;
pub use progress::ports::{ActivityLedger, ProgressRepository, StatsStore};
pub use progress::{compute_streaks, ProgressService, ProgressUpdate};
