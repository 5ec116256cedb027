//! Advertisement repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::Advertisement;

use crate::entities::AdvertisementEntity;
use crate::metrics::{QueryTimer, BACKEND_POSTGRES};
use crate::store::{
    AdvertisementChanges, AdvertisementPage, AdvertisementStore, ListFilter, NewAdvertisement,
    StoreError,
};

/// Repository for advertisement-related database operations.
#[derive(Clone)]
pub struct AdvertisementRepository {
    pool: PgPool,
}

impl AdvertisementRepository {
    /// Creates a new AdvertisementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdvertisementStore for AdvertisementRepository {
    async fn list_published_ids(&self) -> Result<Vec<i64>, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "list_published_ids");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM advertisements WHERE published = true ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "find_advertisement_by_id");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            SELECT * FROM advertisements WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn create(&self, new: NewAdvertisement) -> Result<Advertisement, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "create_advertisement");
        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            INSERT INTO advertisements (uuid, title, image_ref, image_alt, target_url,
                                        published, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.image_ref)
        .bind(&new.image_alt)
        .bind(&new.target_url)
        .bind(new.published)
        .bind(new.owner_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    async fn update(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "update_advertisement");

        // $5 says whether image_alt was part of the update, since NULL is a valid new value.
        let (alt_changed, alt_value) = match changes.image_alt {
            Some(value) => (true, value),
            None => (false, None),
        };

        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            UPDATE advertisements SET
                title = COALESCE($2, title),
                image_ref = COALESCE($3, image_ref),
                image_alt = CASE WHEN $5 THEN $4 ELSE image_alt END,
                target_url = COALESCE($6, target_url),
                published = COALESCE($7, published),
                owner_id = COALESCE($8, owner_id),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.image_ref)
        .bind(alt_value)
        .bind(alt_changed)
        .bind(changes.target_url)
        .bind(changes.published)
        .bind(changes.owner_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        Ok(result?.map(Into::into))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "delete_advertisement");
        let result = sqlx::query(
            r#"
            DELETE FROM advertisements WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    async fn list(&self, filter: ListFilter) -> Result<AdvertisementPage, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "list_advertisements");
        let (cursor_ts, cursor_id) = match filter.cursor {
            Some(cursor) => (Some(cursor.updated_at), Some(cursor.id)),
            None => (None, None),
        };

        let result = sqlx::query_as::<_, AdvertisementEntity>(
            r#"
            SELECT * FROM advertisements
            WHERE ($1::timestamptz IS NULL OR (updated_at, id) < ($1, $2))
              AND ($3::boolean IS NULL OR published = $3)
            ORDER BY updated_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(cursor_ts)
        .bind(cursor_id)
        .bind(filter.published)
        .bind(filter.limit + 1)
        .fetch_all(&self.pool)
        .await;
        timer.record();

        let rows = result?.into_iter().map(Into::into).collect();
        Ok(AdvertisementPage::from_overfetch(rows, filter.limit))
    }

    async fn count(&self, published: Option<bool>) -> Result<i64, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "count_advertisements");
        let result: Result<(i64,), sqlx::Error> = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM advertisements
            WHERE ($1::boolean IS NULL OR published = $1)
            "#,
        )
        .bind(published)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
