//! In-memory stores.
//!
//! Used when no database URL is configured and by the integration tests.
//! Semantics match the PostgreSQL repositories: case-insensitive unique
//! titles, `updated_at` strictly advancing on every update, newest-change
//! first listings.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::models::{Advertisement, AdvertisementSettings};

use crate::metrics::{QueryTimer, BACKEND_MEMORY};
use crate::store::{
    AdvertisementChanges, AdvertisementPage, AdvertisementStore, ListFilter, NewAdvertisement,
    SettingsStore, StoreError,
};

#[derive(Debug, Default)]
struct AdvertisementTable {
    last_id: i64,
    rows: BTreeMap<i64, Advertisement>,
}

impl AdvertisementTable {
    fn title_taken(&self, title: &str, except: Option<i64>) -> bool {
        let wanted = title.to_lowercase();
        self.rows
            .values()
            .any(|ad| Some(ad.id) != except && ad.title.to_lowercase() == wanted)
    }
}

fn duplicate_title() -> StoreError {
    StoreError::Conflict("An advertisement with this title already exists".into())
}

/// Next `updated_at`, never equal to or before the previous one.
fn advance(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// Advertisement store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAdvertisementStore {
    table: RwLock<AdvertisementTable>,
}

impl InMemoryAdvertisementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AdvertisementStore for InMemoryAdvertisementStore {
    async fn list_published_ids(&self) -> Result<Vec<i64>, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "list_published_ids");
        let table = self.table.read().await;
        let ids = table
            .rows
            .values()
            .filter(|ad| ad.published)
            .map(|ad| ad.id)
            .collect();
        timer.record();
        Ok(ids)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Advertisement>, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "find_advertisement_by_id");
        let found = self.table.read().await.rows.get(&id).cloned();
        timer.record();
        Ok(found)
    }

    async fn create(&self, new: NewAdvertisement) -> Result<Advertisement, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "create_advertisement");
        let mut table = self.table.write().await;
        if table.title_taken(&new.title, None) {
            return Err(duplicate_title());
        }

        table.last_id += 1;
        let now = Utc::now();
        let ad = Advertisement {
            id: table.last_id,
            uuid: Uuid::new_v4(),
            title: new.title,
            image_ref: new.image_ref,
            image_alt: new.image_alt,
            target_url: new.target_url,
            published: new.published,
            owner_id: new.owner_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(ad.id, ad.clone());
        timer.record();
        Ok(ad)
    }

    async fn update(
        &self,
        id: i64,
        changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "update_advertisement");
        let mut table = self.table.write().await;

        if let Some(title) = &changes.title {
            if table.rows.contains_key(&id) && table.title_taken(title, Some(id)) {
                return Err(duplicate_title());
            }
        }

        let Some(ad) = table.rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            ad.title = title;
        }
        if let Some(image_ref) = changes.image_ref {
            ad.image_ref = image_ref;
        }
        if let Some(image_alt) = changes.image_alt {
            ad.image_alt = image_alt;
        }
        if let Some(target_url) = changes.target_url {
            ad.target_url = target_url;
        }
        if let Some(published) = changes.published {
            ad.published = published;
        }
        if let Some(owner_id) = changes.owner_id {
            ad.owner_id = owner_id;
        }
        ad.updated_at = advance(ad.updated_at);

        let updated = ad.clone();
        timer.record();
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "delete_advertisement");
        let removed = self.table.write().await.rows.remove(&id).is_some();
        timer.record();
        Ok(removed)
    }

    async fn list(&self, filter: ListFilter) -> Result<AdvertisementPage, StoreError> {
        let timer = QueryTimer::new(BACKEND_MEMORY, "list_advertisements");
        let table = self.table.read().await;

        let mut rows: Vec<Advertisement> = table
            .rows
            .values()
            .filter(|ad| filter.published.map_or(true, |p| ad.published == p))
            .filter(|ad| {
                filter
                    .cursor
                    .map_or(true, |c| (ad.updated_at, ad.id) < (c.updated_at, c.id))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        rows.truncate(filter.limit.max(0) as usize + 1);

        timer.record();
        Ok(AdvertisementPage::from_overfetch(rows, filter.limit))
    }

    async fn count(&self, published: Option<bool>) -> Result<i64, StoreError> {
        let table = self.table.read().await;
        let count = table
            .rows
            .values()
            .filter(|ad| published.map_or(true, |p| ad.published == p))
            .count();
        Ok(count as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Settings store held in process memory.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    settings: RwLock<AdvertisementSettings>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `settings`.
    pub fn with_settings(settings: AdvertisementSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn load(&self) -> Result<AdvertisementSettings, StoreError> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: &AdvertisementSettings) -> Result<(), StoreError> {
        *self.settings.write().await = settings.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{faker::lorem::en::Words, Fake};
    use tokio_test::{assert_err, assert_ok};

    fn new_ad(title: &str, published: bool) -> NewAdvertisement {
        NewAdvertisement {
            title: title.to_string(),
            image_ref: "/files/advertisement_images/banner.png".to_string(),
            image_alt: None,
            target_url: "https://example.com".to_string(),
            published,
            owner_id: 0,
        }
    }

    fn filter(limit: i64) -> ListFilter {
        ListFilter {
            cursor: None,
            limit,
            published: None,
        }
    }

    fn random_title() -> String {
        Words(2..5).fake::<Vec<String>>().join(" ")
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_timestamps() {
        let store = InMemoryAdvertisementStore::new();
        let first = assert_ok!(store.create(new_ad(&random_title(), true)).await);
        let second = assert_ok!(store.create(new_ad("Second of its kind", true)).await);

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_ne!(first.uuid, second.uuid);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(first.owner_id, 0);
    }

    #[tokio::test]
    async fn test_duplicate_title_conflicts_case_insensitive() {
        let store = InMemoryAdvertisementStore::new();
        store.create(new_ad("Summer Sale", true)).await.unwrap();

        let err = assert_err!(store.create(new_ad("summer sale", false)).await);
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_published_ids_skips_unpublished() {
        let store = InMemoryAdvertisementStore::new();
        store.create(new_ad("A", true)).await.unwrap();
        store.create(new_ad("B", false)).await.unwrap();
        store.create(new_ad("C", true)).await.unwrap();

        assert_eq!(store.list_published_ids().await.unwrap(), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_update_applies_changes_and_advances_timestamp() {
        let store = InMemoryAdvertisementStore::new();
        let created = store.create(new_ad("A", true)).await.unwrap();

        let updated = store
            .update(
                created.id,
                AdvertisementChanges {
                    published: Some(false),
                    image_alt: Some(Some("Alt".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert!(!updated.published);
        assert_eq!(updated.image_alt.as_deref(), Some("Alt"));
        assert_eq!(updated.title, "A");
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_update_title_conflict() {
        let store = InMemoryAdvertisementStore::new();
        store.create(new_ad("A", true)).await.unwrap();
        let b = store.create(new_ad("B", true)).await.unwrap();

        let err = store
            .update(
                b.id,
                AdvertisementChanges {
                    title: Some("a".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // Renaming to its own title (different case) is allowed.
        let renamed = store
            .update(
                b.id,
                AdvertisementChanges {
                    title: Some("b".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.title, "b");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let store = InMemoryAdvertisementStore::new();
        let result = store
            .update(99, AdvertisementChanges::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryAdvertisementStore::new();
        let ad = store.create(new_ad("A", true)).await.unwrap();

        assert!(store.delete(ad.id).await.unwrap());
        assert!(!store.delete(ad.id).await.unwrap());
        assert!(store.find_by_id(ad.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pages_newest_change_first() {
        let store = InMemoryAdvertisementStore::new();
        for title in ["A", "B", "C"] {
            store.create(new_ad(title, true)).await.unwrap();
        }
        // Touch A so it becomes the most recently changed.
        store
            .update(
                1,
                AdvertisementChanges {
                    published: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let first = store.list(filter(2)).await.unwrap();
        let titles: Vec<_> = first.items.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles[0], "A");
        assert_eq!(first.items.len(), 2);
        let cursor = first.next_cursor.expect("more pages");

        let second = store
            .list(ListFilter {
                cursor: Some(cursor),
                ..filter(2)
            })
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_cursor.is_none());

        let mut all: Vec<_> = first.items.iter().chain(&second.items).map(|a| a.id).collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_list_and_count_filter_by_status() {
        let store = InMemoryAdvertisementStore::new();
        store.create(new_ad("A", true)).await.unwrap();
        store.create(new_ad("B", false)).await.unwrap();

        let page = store
            .list(ListFilter {
                published: Some(false),
                ..filter(10)
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "B");

        assert_eq!(store.count(None).await.unwrap(), 2);
        assert_eq!(store.count(Some(true)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let store = InMemorySettingsStore::new();
        assert_eq!(store.load().await.unwrap(), AdvertisementSettings::default());

        let settings = AdvertisementSettings {
            page_cache_max_age: Some(300),
            targeting_content_types: ["article".to_string()].into_iter().collect(),
        };
        store.save(&settings).await.unwrap();
        assert_eq!(store.load().await.unwrap(), settings);
    }
}
