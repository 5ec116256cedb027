//! Advertisement admin endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use persistence::{AdvertisementChanges, ListFilter, NewAdvertisement};
use shared::pagination::{clamp_page_size, ListCursor};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::advertisement::{
    AdvertisementListRow, AdvertisementResponse, CreateAdvertisementRequest,
    ListAdvertisementsQuery, ListAdvertisementsResponse, UpdateAdvertisementRequest,
};

fn not_found(advertisement_id: i64) -> ApiError {
    ApiError::NotFound(format!("Advertisement {} not found", advertisement_id))
}

/// List advertisements, most recently changed first.
///
/// GET /api/v1/advertisements?cursor=&limit=&status=published|unpublished
pub async fn list_advertisements(
    State(state): State<AppState>,
    Query(query): Query<ListAdvertisementsQuery>,
) -> Result<Json<ListAdvertisementsResponse>, ApiError> {
    let cursor = query
        .cursor
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(ListCursor::decode)
        .transpose()?;
    let published = query.status.map(|s| s.is_published());

    let page = state
        .ads
        .list(ListFilter {
            cursor,
            limit: clamp_page_size(query.limit),
            published,
        })
        .await?;
    let total = state.ads.count(published).await?;

    Ok(Json(ListAdvertisementsResponse {
        advertisements: page.items.into_iter().map(AdvertisementListRow::from).collect(),
        total,
        next_cursor: page.next_cursor.map(|c| c.encode()),
    }))
}

/// Create an advertisement.
///
/// POST /api/v1/advertisements
pub async fn create_advertisement(
    State(state): State<AppState>,
    Json(request): Json<CreateAdvertisementRequest>,
) -> Result<(StatusCode, Json<AdvertisementResponse>), ApiError> {
    request.validate()?;

    let ad = state.ads.create(NewAdvertisement::from(request)).await?;

    info!(
        advertisement_id = ad.id,
        uuid = %ad.uuid,
        published = ad.published,
        owner_id = ad.owner_id,
        "Advertisement created"
    );

    Ok((StatusCode::CREATED, Json(ad.into())))
}

/// Get a single advertisement.
///
/// GET /api/v1/advertisements/:advertisement_id
pub async fn get_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i64>,
) -> Result<Json<AdvertisementResponse>, ApiError> {
    let ad = state
        .ads
        .find_by_id(advertisement_id)
        .await?
        .ok_or_else(|| not_found(advertisement_id))?;

    Ok(Json(ad.into()))
}

/// Partially update an advertisement.
///
/// PATCH /api/v1/advertisements/:advertisement_id
pub async fn update_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i64>,
    Json(request): Json<UpdateAdvertisementRequest>,
) -> Result<Json<AdvertisementResponse>, ApiError> {
    request.validate()?;
    if request.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let ad = state
        .ads
        .update(advertisement_id, AdvertisementChanges::from(request))
        .await?
        .ok_or_else(|| not_found(advertisement_id))?;

    info!(
        advertisement_id = ad.id,
        published = ad.published,
        "Advertisement updated"
    );

    Ok(Json(ad.into()))
}

/// Delete an advertisement.
///
/// DELETE /api/v1/advertisements/:advertisement_id
pub async fn delete_advertisement(
    State(state): State<AppState>,
    Path(advertisement_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.ads.delete(advertisement_id).await? {
        return Err(not_found(advertisement_id));
    }

    info!(advertisement_id, "Advertisement deleted");
    Ok(StatusCode::NO_CONTENT)
}
