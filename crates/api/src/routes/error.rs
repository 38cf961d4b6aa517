//! Domain error → HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use learnarc_domain::LearnArcError;
use serde_json::json;

/// Wrapper so domain errors can be returned straight from handlers.
#[derive(Debug)]
pub struct ApiError(pub LearnArcError);

impl From<LearnArcError> for ApiError {
    fn from(value: LearnArcError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            LearnArcError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LearnArcError::Auth(_) => StatusCode::UNAUTHORIZED,
            LearnArcError::NotFound(_) => StatusCode::NOT_FOUND,
            LearnArcError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            LearnArcError::Network(_) | LearnArcError::Provider(_) => StatusCode::BAD_GATEWAY,
            LearnArcError::Database(_)
            | LearnArcError::Config(_)
            | LearnArcError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        (status, Json(json!({ "error": self.0 }))).into_response()
    }
}

/// Handler result alias.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: LearnArcError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn error_variants_map_to_expected_statuses() {
        assert_eq!(status_of(LearnArcError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(LearnArcError::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(LearnArcError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(LearnArcError::RateLimited(10)), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_of(LearnArcError::Provider("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(LearnArcError::Database("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
