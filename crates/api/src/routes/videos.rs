//! Video catalog routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use learnarc_domain::Video;
use learnarc_infra::integrations::youtube::player_error_message;
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// `GET /api/videos/search?q=`
pub async fn search(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Video>>> {
    Ok(Json(ctx.catalog.search(&params.q).await?))
}

/// `GET /api/videos/{id}`
pub async fn get_video(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Video>> {
    Ok(Json(ctx.catalog.video(&id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerErrorResponse {
    pub code: u16,
    pub message: String,
}

/// `GET /api/videos/player-errors/{code}`
///
/// Fixed mapping from embedded-player error codes to display strings.
pub async fn player_error(Path(code): Path<u16>) -> Json<PlayerErrorResponse> {
    Json(PlayerErrorResponse { code, message: player_error_message(code) })
}
