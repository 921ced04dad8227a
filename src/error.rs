use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::stocks::provider::ProviderError;

/// Handler-level error taxonomy, mapped to one JSON error body per response.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed input (400).
    #[error("{0}")]
    Validation(String),

    /// Bad credentials or missing token (401).
    #[error("{0}")]
    Authentication(String),

    /// Token present but invalid or forged (403).
    #[error("{0}")]
    Authorization(String),

    /// Resource absent or not owned by the caller (404).
    #[error("{0}")]
    NotFound(String),

    /// Price provider failure or unusable payload (500).
    #[error("failed to fetch stock data: {0}")]
    Upstream(String),

    /// Database or unexpected failure (500). Detail is logged, never sent.
    #[error("server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            ApiError::Authentication(msg) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": msg }))
            }
            ApiError::Authorization(msg) => {
                (StatusCode::FORBIDDEN, json!({ "error": msg }))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Upstream(msg) => {
                // Upstream detail aids debugging, so it is echoed to the caller.
                tracing::error!(error = %msg, "price provider failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to fetch stock data", "details": msg }),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = ApiError::Validation("Stock symbol is required".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn authentication_maps_to_401() {
        let res = ApiError::Authentication("Invalid credentials".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn authorization_maps_to_403() {
        let res = ApiError::Authorization("Forbidden: Invalid token".into()).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound("Watchlist item not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_and_internal_map_to_500() {
        let res = ApiError::Upstream("Invalid stock data".into()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let res = ApiError::Internal(anyhow::anyhow!("pool timed out")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
