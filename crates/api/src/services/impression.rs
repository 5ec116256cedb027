//! Public-path selection of the advertisement to show.
//!
//! Store failures never reach the visitor: they are logged, counted and
//! treated as "nothing to show" or "default settings".

use domain::models::{Advertisement, AdvertisementSettings};
use domain::services::AdSelector;
use persistence::{AdvertisementStore, SettingsStore};
use tracing::{debug, warn};

use crate::middleware::metrics::{record_empty_render, record_store_failure};

/// Picks one published advertisement uniformly at random.
///
/// `None` when nothing is published, the picked record vanished or was
/// unpublished in the meantime, or the store failed.
pub async fn select_advertisement(
    ads: &dyn AdvertisementStore,
    selector: &AdSelector,
) -> Option<Advertisement> {
    let ids = match ads.list_published_ids().await {
        Ok(ids) => ids,
        Err(err) => {
            warn!(error = %err, "Failed to list published advertisements");
            record_store_failure("list_published_ids");
            record_empty_render("store_failure");
            return None;
        }
    };

    let Some(id) = selector.pick(&ids) else {
        debug!("No published advertisements");
        record_empty_render("no_published");
        return None;
    };

    match ads.find_by_id(id).await {
        Ok(Some(ad)) if ad.published => Some(ad),
        Ok(_) => {
            debug!(advertisement_id = id, "Selected advertisement is gone or unpublished");
            record_empty_render("vanished");
            None
        }
        Err(err) => {
            warn!(error = %err, advertisement_id = id, "Failed to load advertisement");
            record_store_failure("find_by_id");
            record_empty_render("store_failure");
            None
        }
    }
}

/// Current module settings, or the defaults if they cannot be read.
pub async fn load_settings_or_default(settings: &dyn SettingsStore) -> AdvertisementSettings {
    match settings.load().await {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "Failed to load advertisement settings; using defaults");
            record_store_failure("load_settings");
            AdvertisementSettings::default()
        }
    }
}
