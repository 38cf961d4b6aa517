//! HTTP routes
//!
//! One module per resource; [`router`] assembles the full application.

mod assistant;
mod auth;
mod calendar;
mod error;
mod health;
mod notifications;
mod playlists;
mod progress;
mod videos;

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::{middleware, Router};

pub use error::{ApiError, ApiResult};

use crate::utils::logging::log_request_execution;
use crate::AppContext;

/// Build the application router.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Video catalog
        .route("/api/videos/search", get(videos::search))
        .route("/api/videos/player-errors/{code}", get(videos::player_error))
        .route("/api/videos/{id}", get(videos::get_video))
        // Playlists
        .route("/api/playlists", get(playlists::list).post(playlists::create))
        .route(
            "/api/playlists/{id}",
            get(playlists::get).patch(playlists::update).delete(playlists::delete),
        )
        .route("/api/playlists/{id}/videos", put(playlists::add_video))
        .route("/api/playlists/{id}/videos/{video_id}", delete(playlists::remove_video))
        // Progress & stats
        .route("/api/progress", post(progress::report))
        .route("/api/progress/{video_id}", get(progress::get_progress))
        .route("/api/stats", get(progress::stats))
        // Calendar
        .route("/api/calendar/recent", get(calendar::recent))
        .route("/api/calendar/month/{year}/{month}", get(calendar::month))
        .route("/api/calendar/{date}", get(calendar::day))
        // Assistant
        .route("/api/assistant/chat", post(assistant::chat))
        .route("/api/assistant/study-plan", post(assistant::study_plan))
        .route("/api/assistant/analysis", post(assistant::analysis))
        .route("/api/assistant/recommendations", post(assistant::recommendations))
        // Notifications & reminders
        .route("/api/notifications", get(notifications::list))
        .route(
            "/api/notifications/settings",
            get(notifications::settings).put(notifications::update_settings),
        )
        .route("/api/notifications/{id}/read", post(notifications::mark_read))
        .route(
            "/api/reminders",
            get(notifications::list_reminders).post(notifications::create_reminder),
        )
        // Auth
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .layer(middleware::from_fn(log_request_execution))
        .with_state(ctx)
}
