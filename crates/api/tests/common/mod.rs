//! Common test utilities for integration tests.
//!
//! The router runs over the in-memory stores, so no database is needed.

// Helpers are shared by several test binaries; not every binary uses all of them.
#![allow(dead_code)]

use std::sync::Arc;

use advertisement_api::{
    app::{create_app, Stores},
    config::{
        CacheConfig, Config, DatabaseConfig, LoggingConfig, SecurityConfig, SelectionConfig,
        ServerConfig,
    },
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use domain::models::{Advertisement, AdvertisementSettings};
use fake::{faker::lorem::en::Words, Fake};
use persistence::{
    AdvertisementChanges, AdvertisementPage, AdvertisementStore, InMemoryAdvertisementStore,
    InMemorySettingsStore, ListFilter, NewAdvertisement, SettingsStore, StoreError,
};
use serde_json::Value;

/// Plain-text admin key used by the tests.
pub const ADMIN_KEY: &str = "test-admin-key";

/// Host default page-cache max-age used by the tests.
pub const HOST_MAX_AGE: i64 = 120;

/// Test configuration with a seeded selector and a known admin key.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            admin_api_key_hash: shared::crypto::sha256_hex(ADMIN_KEY),
        },
        cache: CacheConfig {
            page_max_age: HOST_MAX_AGE,
        },
        selection: SelectionConfig { seed: Some(42) },
    }
}

/// Store handles kept by a test so it can seed data behind the router.
pub struct TestContext {
    pub app: Router,
    pub ads: Arc<InMemoryAdvertisementStore>,
    pub settings: Arc<InMemorySettingsStore>,
}

/// Router over fresh in-memory stores.
pub fn test_context() -> TestContext {
    test_context_with_settings(AdvertisementSettings::default())
}

pub fn test_context_with_settings(settings: AdvertisementSettings) -> TestContext {
    let ads = Arc::new(InMemoryAdvertisementStore::new());
    let settings = Arc::new(InMemorySettingsStore::with_settings(settings));
    let stores = Stores {
        ads: ads.clone(),
        settings: settings.clone(),
        backend: persistence::metrics::BACKEND_MEMORY,
    };
    TestContext {
        app: create_app(test_config(), stores),
        ads,
        settings,
    }
}

/// Router whose stores fail every call with `Unavailable`.
pub fn failing_app() -> Router {
    let stores = Stores {
        ads: Arc::new(FailingStore),
        settings: Arc::new(FailingStore),
        backend: "failing",
    };
    create_app(test_config(), stores)
}

/// Store that is always down.
pub struct FailingStore;

fn down() -> StoreError {
    StoreError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl AdvertisementStore for FailingStore {
    async fn list_published_ids(&self) -> Result<Vec<i64>, StoreError> {
        Err(down())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Advertisement>, StoreError> {
        Err(down())
    }

    async fn create(&self, _new: NewAdvertisement) -> Result<Advertisement, StoreError> {
        Err(down())
    }

    async fn update(
        &self,
        _id: i64,
        _changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        Err(down())
    }

    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Err(down())
    }

    async fn list(&self, _filter: ListFilter) -> Result<AdvertisementPage, StoreError> {
        Err(down())
    }

    async fn count(&self, _published: Option<bool>) -> Result<i64, StoreError> {
        Err(down())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(down())
    }
}

#[async_trait]
impl SettingsStore for FailingStore {
    async fn load(&self) -> Result<AdvertisementSettings, StoreError> {
        Err(down())
    }

    async fn save(&self, _settings: &AdvertisementSettings) -> Result<(), StoreError> {
        Err(down())
    }
}

/// Router whose listing reports `ids` as published while loading them
/// yields nothing, or fails when `load_fails` is set.
pub fn vanishing_app(ids: Vec<i64>, load_fails: bool) -> Router {
    let stores = Stores {
        ads: Arc::new(VanishingStore { ids, load_fails }),
        settings: Arc::new(InMemorySettingsStore::new()),
        backend: "vanishing",
    };
    create_app(test_config(), stores)
}

/// Store whose records disappear between listing and loading.
pub struct VanishingStore {
    ids: Vec<i64>,
    load_fails: bool,
}

#[async_trait]
impl AdvertisementStore for VanishingStore {
    async fn list_published_ids(&self) -> Result<Vec<i64>, StoreError> {
        Ok(self.ids.clone())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Advertisement>, StoreError> {
        if self.load_fails {
            Err(StoreError::Database("row decode failed".to_string()))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, _new: NewAdvertisement) -> Result<Advertisement, StoreError> {
        Err(down())
    }

    async fn update(
        &self,
        _id: i64,
        _changes: AdvertisementChanges,
    ) -> Result<Option<Advertisement>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _id: i64) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn list(&self, _filter: ListFilter) -> Result<AdvertisementPage, StoreError> {
        Err(down())
    }

    async fn count(&self, _published: Option<bool>) -> Result<i64, StoreError> {
        Ok(self.ids.len() as i64)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A valid advertisement with a random title.
pub fn new_advertisement(published: bool) -> NewAdvertisement {
    let words: Vec<String> = Words(2..4).fake();
    NewAdvertisement {
        title: format!("{} {}", words.join(" "), uuid::Uuid::new_v4().simple()),
        image_ref: "/files/advertisement_images/banner.png".to_string(),
        image_alt: None,
        target_url: "https://example.com/offer".to_string(),
        published,
        owner_id: 0,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Request carrying the admin key.
pub fn admin_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("X-API-Key", ADMIN_KEY);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
