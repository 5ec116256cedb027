//! Persistence layer for the advertisement service.
//!
//! This crate contains:
//! - Store traits consumed by the HTTP layer
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - PostgreSQL repositories and in-memory stores

pub mod db;
pub mod entities;
pub mod memory;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use memory::{InMemoryAdvertisementStore, InMemorySettingsStore};
pub use repositories::{AdvertisementRepository, SettingsRepository};
pub use store::{
    AdvertisementChanges, AdvertisementPage, AdvertisementStore, ListFilter, NewAdvertisement,
    SettingsStore, StoreError,
};
