//! Admin API key authentication.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::crypto::verify_sha256_hex;

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware for admin-only routes.
///
/// The `X-API-Key` header must hash (SHA-256) to the configured
/// `security.admin_api_key_hash`. With no hash configured every request
/// is rejected.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let expected = state.config.security.admin_api_key_hash.as_str();
    if expected.is_empty() {
        tracing::debug!("Admin API request rejected: no admin key configured");
        return ApiError::Unauthorized("Admin API is disabled".into()).into_response();
    }

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty());

    match presented {
        Some(key) if verify_sha256_hex(key, expected) => next.run(req).await,
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "Invalid admin API key");
            ApiError::Unauthorized("Invalid or missing API key".into()).into_response()
        }
        None => ApiError::Unauthorized("Invalid or missing API key".into()).into_response(),
    }
}
