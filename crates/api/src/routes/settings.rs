//! Settings form endpoints.

use axum::{extract::State, Json};
use domain::models::settings::{SettingsFormResponse, UpdateSettingsRequest};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;

/// Current settings plus the cache periods the form offers.
///
/// GET /api/v1/advertisement/settings
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsFormResponse>, ApiError> {
    let settings = state.settings.load().await?;
    Ok(Json(SettingsFormResponse::new(
        settings,
        state.config.cache.page_max_age,
    )))
}

/// Validate and save the settings form.
///
/// PUT /api/v1/advertisement/settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<SettingsFormResponse>, ApiError> {
    let settings = request.into_settings()?;
    state.settings.save(&settings).await?;

    info!(
        page_cache_max_age = ?settings.page_cache_max_age,
        targeted_bundles = settings.targeting_content_types.len(),
        "Advertisement settings saved"
    );

    Ok(Json(SettingsFormResponse::new(
        settings,
        state.config.cache.page_max_age,
    )))
}
