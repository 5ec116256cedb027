//! Advertisement setting entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the advertisement_settings table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingEntity {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl SettingEntity {
    pub fn into_pair(self) -> (String, serde_json::Value) {
        (self.key, self.value)
    }
}
