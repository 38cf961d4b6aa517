//! AI assistant routes

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use learnarc_core::{AssistantContext, AssistantReply, SkillLevel};
use serde::Deserialize;

use super::error::ApiResult;
use crate::AppContext;

const RECENT_ACTIVITY_WINDOW: usize = 10;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    pub topic: String,
    pub skill_level: SkillLevel,
    pub timeframe: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsRequest {
    pub interests: Vec<String>,
    pub skill_level: SkillLevel,
}

async fn assistant_context(ctx: &AppContext) -> ApiResult<AssistantContext> {
    let stats = ctx.progress.stats().await?;
    let recent = ctx.calendar.recent(RECENT_ACTIVITY_WINDOW).await?;
    let recent_videos = recent.iter().map(|activity| activity.video.title.clone()).collect();
    Ok(AssistantContext { stats, recent_videos })
}

/// `POST /api/assistant/chat`
pub async fn chat(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<AssistantReply>> {
    let context = assistant_context(&ctx).await?;
    Ok(Json(ctx.assistant.chat(&request.message, &context).await?))
}

/// `POST /api/assistant/study-plan`
pub async fn study_plan(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<StudyPlanRequest>,
) -> ApiResult<Json<AssistantReply>> {
    let context = assistant_context(&ctx).await?;
    let reply = ctx
        .assistant
        .study_plan(&request.topic, request.skill_level, &request.timeframe, &context)
        .await?;
    Ok(Json(reply))
}

/// `POST /api/assistant/analysis`
pub async fn analysis(State(ctx): State<Arc<AppContext>>) -> ApiResult<Json<AssistantReply>> {
    let context = assistant_context(&ctx).await?;
    let recent = ctx.calendar.recent(RECENT_ACTIVITY_WINDOW).await?;
    Ok(Json(ctx.assistant.analyze_progress(&context, &recent).await?))
}

/// `POST /api/assistant/recommendations`
pub async fn recommendations(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<RecommendationsRequest>,
) -> ApiResult<Json<AssistantReply>> {
    let context = assistant_context(&ctx).await?;
    let reply = ctx
        .assistant
        .recommendations(&request.interests, request.skill_level, &context)
        .await?;
    Ok(Json(reply))
}
