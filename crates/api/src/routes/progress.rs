//! Progress reporting and statistics routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use learnarc_core::ProgressUpdate;
use learnarc_domain::{LearnArcError, UserStats, Video, VideoProgress};
use serde::Deserialize;

use super::error::ApiResult;
use crate::AppContext;

/// A playback position report.
///
/// Carries the full video so the daily ledger and notifications have the
/// title and thumbnail without a provider round trip (the player already
/// holds the video it is playing).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub video: Video,
    pub position_secs: f64,
    pub duration_secs: f64,
}

/// `POST /api/progress`
pub async fn report(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<ProgressReport>,
) -> ApiResult<Json<ProgressUpdate>> {
    let update = ctx
        .progress
        .record(&request.video, request.position_secs, request.duration_secs)
        .await?;
    Ok(Json(update))
}

/// `GET /api/progress/{video_id}`
pub async fn get_progress(
    State(ctx): State<Arc<AppContext>>,
    Path(video_id): Path<String>,
) -> ApiResult<Json<VideoProgress>> {
    let progress = ctx
        .progress
        .progress_for(&video_id)
        .await?
        .ok_or_else(|| LearnArcError::NotFound(format!("no progress for video {video_id}")))?;
    Ok(Json(progress))
}

/// `GET /api/stats`
pub async fn stats(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<UserStats>> {
    Ok(Json(ctx.progress.stats().await?))
}
