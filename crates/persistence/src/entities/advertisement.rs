//! Advertisement entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Advertisement;

/// Database row mapping for the advertisements table.
#[derive(Debug, Clone, FromRow)]
pub struct AdvertisementEntity {
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

impl From<AdvertisementEntity> for Advertisement {
    fn from(entity: AdvertisementEntity) -> Self {
        Self {
            id: entity.id,
            uuid: entity.uuid,
            title: entity.title,
            image_ref: entity.image_ref,
            image_alt: entity.image_alt,
            target_url: entity.target_url,
            published: entity.published,
            owner_id: entity.owner_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
