//! Database entity definitions (row mappings).

pub mod advertisement;
pub mod setting;

pub use advertisement::AdvertisementEntity;
pub use setting::SettingEntity;
