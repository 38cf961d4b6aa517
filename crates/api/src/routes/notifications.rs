//! Notification and reminder routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use learnarc_domain::{Notification, NotificationSettings, Reminder};
use serde::Deserialize;
use uuid::Uuid;

use super::error::ApiResult;
use crate::AppContext;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub unread: bool,
}

/// `GET /api/notifications?unread=`
pub async fn list(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(ctx.notifications.list(params.unread).await?))
}

/// `POST /api/notifications/{id}/read`
pub async fn mark_read(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ctx.notifications.mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/notifications/settings`
pub async fn settings(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<NotificationSettings>> {
    Ok(Json(ctx.notifications.settings().await?))
}

/// `PUT /api/notifications/settings`
pub async fn update_settings(
    State(ctx): State<Arc<AppContext>>,
    Json(settings): Json<NotificationSettings>,
) -> ApiResult<Json<NotificationSettings>> {
    Ok(Json(ctx.notifications.update_settings(settings).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub title: String,
    #[serde(default)]
    pub message: String,
    pub scheduled_for: DateTime<Utc>,
    pub video_id: Option<String>,
}

/// `GET /api/reminders`
pub async fn list_reminders(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<Json<Vec<Reminder>>> {
    Ok(Json(ctx.notifications.pending_reminders().await?))
}

/// `POST /api/reminders`
pub async fn create_reminder(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<CreateReminderRequest>,
) -> ApiResult<(StatusCode, Json<Reminder>)> {
    let mut reminder = Reminder::new(request.title, request.message, request.scheduled_for);
    reminder.video_id = request.video_id;
    let reminder = ctx.notifications.add_reminder(reminder).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}
