//! Advertisement domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Owner id used when no owner has been set explicitly (the anonymous user).
pub const ANONYMOUS_OWNER_ID: i64 = 0;

/// Represents an advertisement in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advertisement {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub image_ref: String,
    pub image_alt: Option<String>,
    pub target_url: String,
    pub published: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Advertisement {
    /// Human-readable publishing status as shown in the admin listing.
    pub fn status_label(&self) -> &'static str {
        PublishStatus::from(self.published).label()
    }

    /// Text used for the image `alt` attribute; falls back to the title.
    pub fn alt_text(&self) -> &str {
        self.image_alt
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
            .unwrap_or(&self.title)
    }
}

/// Publishing state of an advertisement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Published,
    Unpublished,
}

impl PublishStatus {
    pub fn is_published(self) -> bool {
        matches!(self, PublishStatus::Published)
    }

    pub fn label(self) -> &'static str {
        match self {
            PublishStatus::Published => "published",
            PublishStatus::Unpublished => "not published",
        }
    }
}

impl From<bool> for PublishStatus {
    fn from(published: bool) -> Self {
        if published {
            PublishStatus::Published
        } else {
            PublishStatus::Unpublished
        }
    }
}

fn default_published() -> bool {
    true
}

/// Request payload for creating an advertisement.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdvertisementRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(custom(function = "shared::validation::validate_image_ref"))]
    pub image_ref: String,

    #[validate(length(max = 512, message = "Alternative text must be at most 512 characters"))]
    pub image_alt: Option<String>,

    #[validate(custom(function = "shared::validation::validate_target_url"))]
    pub target_url: String,

    #[serde(default = "default_published")]
    pub published: bool,

    #[validate(range(min = 0, message = "Owner id must not be negative"))]
    pub owner_id: Option<i64>,
}

impl CreateAdvertisementRequest {
    /// Owner to store: the requested one, or the anonymous owner.
    pub fn resolved_owner_id(&self) -> i64 {
        self.owner_id.unwrap_or(ANONYMOUS_OWNER_ID)
    }
}

/// Request payload for updating an advertisement (partial update).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdvertisementRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    #[validate(custom(function = "shared::validation::validate_image_ref"))]
    pub image_ref: Option<String>,

    #[validate(length(max = 512, message = "Alternative text must be at most 512 characters"))]
    pub image_alt: Option<String>,

    #[validate(custom(function = "shared::validation::validate_target_url"))]
    pub target_url: Option<String>,

    pub published: Option<bool>,

    #[validate(range(min = 0, message = "Owner id must not be negative"))]
    pub owner_id: Option<i64>,
}

impl UpdateAdvertisementRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.image_ref.is_none()
            && self.image_alt.is_none()
            && self.target_url.is_none()
            && self.published.is_none()
            && self.owner_id.is_none()
    }
}

/// Response payload for advertisement operations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementResponse {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub image_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    pub target_url: String,
    pub published: bool,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Advertisement> for AdvertisementResponse {
    fn from(ad: Advertisement) -> Self {
        Self {
            id: ad.id,
            uuid: ad.uuid,
            title: ad.title,
            image_ref: ad.image_ref,
            image_alt: ad.image_alt,
            target_url: ad.target_url,
            published: ad.published,
            owner_id: ad.owner_id,
            created_at: ad.created_at,
            updated_at: ad.updated_at,
        }
    }
}

/// One row of the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementListRow {
    pub id: i64,
    pub uuid: Uuid,
    pub title: String,
    pub status: &'static str,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Advertisement> for AdvertisementListRow {
    fn from(ad: Advertisement) -> Self {
        Self {
            status: ad.status_label(),
            id: ad.id,
            uuid: ad.uuid,
            title: ad.title,
            owner_id: ad.owner_id,
            created_at: ad.created_at,
            updated_at: ad.updated_at,
        }
    }
}

/// Response for listing advertisements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdvertisementsResponse {
    pub advertisements: Vec<AdvertisementListRow>,
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Query parameters for listing advertisements.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAdvertisementsQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
    pub status: Option<PublishStatus>,
}
