//! Sign-in and session routes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use learnarc_domain::{LearnArcError, Session, User};
use serde::{Deserialize, Serialize};

use super::error::ApiResult;
use crate::AppContext;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub url: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: User,
    pub session: Session,
}

/// `GET /auth/login`
pub async fn login(State(ctx): State<Arc<AppContext>>) -> Json<LoginResponse> {
    let request = ctx.oauth.begin_authorization();
    Json(LoginResponse { url: request.url, state: request.state })
}

/// `GET /auth/callback?code=&state=`
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<CallbackParams>,
) -> ApiResult<Json<SignInResponse>> {
    let info = ctx.oauth.exchange_code(&params.code, &params.state).await?;
    let (user, session) = ctx.sessions.sign_in(info).await?;
    Ok(Json(SignInResponse { user, session }))
}

/// `GET /auth/me`
pub async fn me(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<Json<User>> {
    let token = bearer_token(&headers)?;
    Ok(Json(ctx.sessions.authenticate(token).await?))
}

/// `POST /auth/logout`
pub async fn logout(
    State(ctx): State<Arc<AppContext>>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let token = bearer_token(&headers)?;
    ctx.sessions.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, LearnArcError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| LearnArcError::Auth("missing bearer token".into()))
}
