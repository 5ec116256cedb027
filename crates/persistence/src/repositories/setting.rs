//! Settings repository for database operations.

use async_trait::async_trait;
use sqlx::PgPool;

use domain::models::AdvertisementSettings;

use crate::entities::SettingEntity;
use crate::metrics::{QueryTimer, BACKEND_POSTGRES};
use crate::store::{SettingsStore, StoreError};

/// Repository for the advertisement_settings key-value table.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn load(&self) -> Result<AdvertisementSettings, StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "load_settings");
        let result = sqlx::query_as::<_, SettingEntity>(
            r#"
            SELECT key, value, updated_at FROM advertisement_settings
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();

        Ok(AdvertisementSettings::from_key_values(
            result?.into_iter().map(SettingEntity::into_pair),
        ))
    }

    async fn save(&self, settings: &AdvertisementSettings) -> Result<(), StoreError> {
        let timer = QueryTimer::new(BACKEND_POSTGRES, "save_settings");
        let mut tx = self.pool.begin().await?;
        let pairs = settings.to_key_values();
        let count = pairs.len();

        for (key, value) in pairs {
            sqlx::query(
                r#"
                INSERT INTO advertisement_settings (key, value, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();
        tracing::debug!(keys = count, "Advertisement settings persisted");
        Ok(())
    }
}
