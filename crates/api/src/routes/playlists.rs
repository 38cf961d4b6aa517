//! Playlist routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use learnarc_domain::{Playlist, Video};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ApiResult;
use crate::AppContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVideoRequest {
    pub video: Video,
}

/// `GET /api/playlists`
pub async fn list(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<Vec<Playlist>>> {
    Ok(Json(ctx.playlists.list().await?))
}

/// `POST /api/playlists`
pub async fn create(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<CreatePlaylistRequest>,
) -> ApiResult<(StatusCode, Json<Playlist>)> {
    let playlist = ctx.playlists.create(&request.name, &request.description).await?;
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// `GET /api/playlists/{id}`
pub async fn get(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(ctx.playlists.get(id).await?))
}

/// `PATCH /api/playlists/{id}`
pub async fn update(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlaylistRequest>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(ctx.playlists.update(id, request.name, request.description).await?))
}

/// `DELETE /api/playlists/{id}`
pub async fn delete(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ctx.playlists.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /api/playlists/{id}/videos`
pub async fn add_video(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddVideoRequest>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(ctx.playlists.add_video(id, request.video).await?))
}

/// `DELETE /api/playlists/{id}/videos/{video_id}`
pub async fn remove_video(
    State(ctx): State<Arc<AppContext>>,
    Path((id, video_id)): Path<(Uuid, String)>,
) -> ApiResult<Json<Playlist>> {
    Ok(Json(ctx.playlists.remove_video(id, &video_id).await?))
}
