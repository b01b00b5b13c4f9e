//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, ApiError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use pagecraft_engine::{GatewayError, SaveError, StoreError};

/// Application-level error type for the editor API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Section gateway operation failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Section store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Saving an editing session failed.
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// Editing session does not exist or has expired.
    #[error("Editing session not found")]
    SessionNotFound,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Gateway(
                GatewayError::Database(_)
                    | GatewayError::DataCorruption(_)
                    | GatewayError::Unavailable(_)
            ) | Self::Save(SaveError::Gateway(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Gateway(GatewayError::NotFound) => StatusCode::NOT_FOUND,
            Self::Gateway(GatewayError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::SectionNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::IndexOutOfBounds { .. }) => StatusCode::BAD_REQUEST,
            Self::Save(SaveError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Save(SaveError::Gateway(_)) => StatusCode::BAD_GATEWAY,
            Self::SessionNotFound | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Save(SaveError::Validation { violations }) => serde_json::json!({
                "error": self.to_string(),
                "violations": violations,
            }),
            Self::Save(SaveError::Gateway(err)) => serde_json::json!({
                "error": format!("Save failed: {err}"),
            }),
            Self::Gateway(GatewayError::NotFound) => serde_json::json!({
                "error": "Not found",
            }),
            Self::Gateway(GatewayError::Unavailable(_)) => serde_json::json!({
                "error": "Storage backend unavailable",
            }),
            Self::Gateway(_) => serde_json::json!({
                "error": "Internal server error",
            }),
            _ => serde_json::json!({
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::SectionId;

    fn get_status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("template".to_string());
        assert_eq!(err.to_string(), "Not found: template");

        let err = ApiError::SessionNotFound;
        assert_eq!(err.to_string(), "Editing session not found");
    }

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            get_status(ApiError::SessionNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Store(StoreError::SectionNotFound(
                SectionId::generate()
            ))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Store(StoreError::IndexOutOfBounds {
                index: 9,
                len: 2
            })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(ApiError::Gateway(GatewayError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ApiError::Save(SaveError::Validation { violations: vec![] })),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(ApiError::Save(SaveError::Gateway(
                GatewayError::Unavailable("backend down".to_string())
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(ApiError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
    }
}
