//! Selection endpoint: one random published advertisement per placeholder.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use domain::models::CacheMetadata;
use domain::services::render_advertisement as render_markup;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_impression;
use crate::services::{load_settings_or_default, select_advertisement};

/// Key of the cache metadata block in the render response.
pub const CACHE_METADATA_KEY: &str = "#cache";

#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    pub id: Option<String>,
}

/// Render one advertisement for a placeholder.
///
/// GET /advertisement/render?id=<placeholderId>
///
/// Responds `{"<id>": "<html>", "#cache": {"max-age": N, "contexts": ["url"]}}`.
/// The markup is empty when nothing can be shown, including on store failure.
pub async fn render_advertisement(
    State(state): State<AppState>,
    Query(query): Query<RenderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let id = query.id.unwrap_or_default();
    shared::validation::validate_html_id(&id).map_err(|e| {
        ApiError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid placeholder id".to_string()),
        )
    })?;

    let markup = match select_advertisement(state.ads.as_ref(), &state.selector).await {
        Some(ad) => {
            tracing::debug!(placeholder = %id, advertisement_id = ad.id, "Rendering advertisement");
            record_impression();
            render_markup(&ad)
        }
        None => String::new(),
    };

    let settings = load_settings_or_default(state.settings.as_ref()).await;
    let cache = CacheMetadata::for_url(
        settings.effective_max_age(state.config.cache.page_max_age),
    );

    let cache_control = cache.cache_control();
    let mut body = Map::new();
    body.insert(id, Value::String(markup));
    body.insert(
        CACHE_METADATA_KEY.to_string(),
        serde_json::to_value(&cache).map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    Ok((
        [(header::CACHE_CONTROL, cache_control)],
        Json(Value::Object(body)),
    ))
}
