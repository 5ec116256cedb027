//! Store abstractions shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use thiserror::Error;

use domain::models::advertisement::{CreateAdvertisementRequest, UpdateAdvertisementRequest};
use domain::models::{Advertisement, AdvertisementSettings};
use shared::pagination::ListCursor;

/// Errors raised by advertisement and settings stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => {
                    StoreError::Conflict("An advertisement with this title already exists".into())
                }
                _ => StoreError::Database(db_err.to_string()),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Fields of an advertisement about to be created.
#[derive(Debug, Clone)]
pub struct NewAdvertisement {
    pub title: String,
    pub image_ref: String,
    pub image_alt: Option<String>,
    pub target_url: String,
    pub published: bool,
    pub owner_id: i64,
}

impl From<CreateAdvertisementRequest> for NewAdvertisement {
    fn from(request: CreateAdvertisementRequest) -> Self {
        Self {
            owner_id: request.resolved_owner_id(),
            title: request.title.trim().to_string(),
            image_ref: request.image_ref.trim().to_string(),
            image_alt: request
                .image_alt
                .map(|alt| alt.trim().to_string())
                .filter(|alt| !alt.is_empty()),
            target_url: request.target_url.trim().to_string(),
            published: request.published,
        }
    }
}

/// Partial update; `None` leaves a field untouched.
///
/// `image_alt: Some(None)` clears the alternative text.
#[derive(Debug, Clone, Default)]
pub struct AdvertisementChanges {
    pub title: Option<String>,
    pub image_ref: Option<String>,
    pub image_alt: Option<Option<String>>,
    pub target_url: Option<String>,
    pub published: Option<bool>,
    pub owner_id: Option<i64>,
}

impl From<UpdateAdvertisementRequest> for AdvertisementChanges {
    fn from(request: UpdateAdvertisementRequest) -> Self {
        Self {
            title: request.title.map(|t| t.trim().to_string()),
            image_ref: request.image_ref.map(|i| i.trim().to_string()),
            image_alt: request.image_alt.map(|alt| {
                let alt = alt.trim().to_string();
                (!alt.is_empty()).then_some(alt)
            }),
            target_url: request.target_url.map(|u| u.trim().to_string()),
            published: request.published,
            owner_id: request.owner_id,
        }
    }
}

/// Listing parameters for the admin overview.
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub cursor: Option<ListCursor>,
    pub limit: i64,
    pub published: Option<bool>,
}

/// One page of the admin overview, newest change first.
#[derive(Debug, Clone)]
pub struct AdvertisementPage {
    pub items: Vec<Advertisement>,
    pub next_cursor: Option<ListCursor>,
}

impl AdvertisementPage {
    /// Builds a page from up to `limit + 1` rows; the extra row only signals
    /// that another page exists.
    pub fn from_overfetch(mut rows: Vec<Advertisement>, limit: i64) -> Self {
        let limit = limit.max(0) as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = if has_more {
            rows.last()
                .map(|ad| ListCursor::new(ad.updated_at, ad.id))
        } else {
            None
        };
        Self {
            items: rows,
            next_cursor,
        }
    }
}

/// Durable storage of advertisement records.
#[async_trait]
pub trait AdvertisementStore: Send + Sync {
    /// Ids of every published advertisement.
    async fn list_published_ids(&self) -> Result<Vec<i64>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>, StoreError>;

    async fn create(&self, new: NewAdvertisement) -> Result<Advertisement, StoreError>;

    /// Applies `changes` and refreshes `updated_at`. `None` if `id` is unknown.
    async fn update(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError>;

    /// Returns whether a record was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn list(&self, filter: ListFilter) -> Result<AdvertisementPage, StoreError>;

    async fn count(&self, published: Option<bool>) -> Result<i64, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Key-value storage of the module settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<AdvertisementSettings, StoreError>;

    async fn save(&self, settings: &AdvertisementSettings) -> Result<(), StoreError>;
}
