//! Domain models for the advertisement service.

pub mod advertisement;
pub mod cache;
pub mod settings;

pub use advertisement::Advertisement;
pub use cache::CacheMetadata;
pub use settings::AdvertisementSettings;
