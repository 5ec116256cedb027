//! Embedded client-side assets.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

/// Name of the client fetcher script inside the assets directory.
pub const CLIENT_SCRIPT: &str = "advertisement.js";

#[derive(Embed)]
#[folder = "assets/"]
struct ClientAssets;

fn serve_asset(path: &str) -> Response {
    match ClientAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(content.data.into_owned()))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the client fetcher.
///
/// GET /advertisement/advertisement.js
pub async fn client_script() -> Response {
    serve_asset(CLIENT_SCRIPT)
}
