//! Calendar routes

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use learnarc_domain::{DailyActivity, DaySummary, LearnArcError};
use serde::Deserialize;

use super::error::ApiResult;
use crate::AppContext;

/// `GET /api/calendar/{date}` (date as `YYYY-MM-DD`)
pub async fn day(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<String>,
) -> ApiResult<Json<Vec<DailyActivity>>> {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        LearnArcError::InvalidInput(format!("{date} is not a YYYY-MM-DD date"))
    })?;
    Ok(Json(ctx.calendar.activities_for(date).await?))
}

/// `GET /api/calendar/month/{year}/{month}`
pub async fn month(
    State(ctx): State<Arc<AppContext>>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Json<Vec<DaySummary>>> {
    Ok(Json(ctx.calendar.month_summary(year, month).await?))
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// `GET /api/calendar/recent?limit=`
pub async fn recent(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<RecentParams>,
) -> ApiResult<Json<Vec<DailyActivity>>> {
    Ok(Json(ctx.calendar.recent(params.limit).await?))
}
