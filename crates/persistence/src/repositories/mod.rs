//! PostgreSQL repository implementations of the store traits.

pub mod advertisement;
pub mod setting;

pub use advertisement::AdvertisementRepository;
pub use setting::SettingsRepository;
