//! Placeholder block endpoint.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use domain::services::placeholder::{PLACEHOLDER_BASE_ID, MAX_SLOTS};
use domain::services::{HtmlIdGenerator, PlaceholderBlock, PlaceholderBlockConfig};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_placeholders_emitted;
use crate::services::load_settings_or_default;

#[derive(Debug, Deserialize)]
pub struct PlaceholderQuery {
    /// Bundle of the content item being viewed; absent on other pages.
    pub bundle: Option<String>,
    pub slots: Option<usize>,
    pub category: Option<String>,
}

/// Base id for one page: `advertisement-<token>`, so blocks fetched in
/// separate requests never hand out the same DOM id.
fn page_base_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}", PLACEHOLDER_BASE_ID, &token[..8])
}

/// Render placeholder markers for the current page.
///
/// GET /advertisement/placeholder?bundle=<bundle>&slots=<1..10>&category=<c>
pub async fn render_placeholder(
    State(state): State<AppState>,
    Query(query): Query<PlaceholderQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bundle = query
        .bundle
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty());
    if let Some(bundle) = bundle {
        shared::validation::validate_bundle(bundle)
            .map_err(|_| ApiError::Validation(format!("Invalid bundle '{}'", bundle)))?;
    }

    let slots = query.slots.unwrap_or(1);
    if !(1..=MAX_SLOTS).contains(&slots) {
        return Err(ApiError::Validation(format!(
            "slots must be between 1 and {}",
            MAX_SLOTS
        )));
    }

    let settings = load_settings_or_default(state.settings.as_ref()).await;
    let block = PlaceholderBlock::new(
        &settings,
        PlaceholderBlockConfig {
            category: query.category,
        },
    );

    let mut ids = HtmlIdGenerator::new();
    let build = block.build(
        bundle,
        slots,
        &page_base_id(),
        &mut ids,
        state.config.cache.page_max_age,
    );
    record_placeholders_emitted(build.ids.len());

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CACHE_CONTROL, build.cache.cache_control()),
        ],
        build.markup,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_base_id_is_namespaced() {
        let a = page_base_id();
        let b = page_base_id();
        assert!(a.starts_with("advertisement-"));
        assert_eq!(a.len(), "advertisement-".len() + 8);
        assert_ne!(a, b);
    }
}
