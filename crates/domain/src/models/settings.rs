//! Module settings: cache override and content-type targeting.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Settings key for the page-cache max-age override.
pub const CACHE_MAX_AGE_KEY: &str = "cache.page.max_age";

/// Settings key for the placeholder targeting bundles.
pub const TARGETING_CONTENT_TYPES_KEY: &str = "targeting.content_types";

/// Cache periods (seconds) offered by the settings form.
pub const CACHE_PERIODS: [u32; 14] = [
    0, 60, 180, 300, 600, 900, 1800, 2700, 3600, 10800, 21600, 32400, 43200, 86400,
];

/// Persisted advertisement settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvertisementSettings {
    /// Overrides the host default page-cache max-age when set.
    pub page_cache_max_age: Option<i64>,
    /// Bundles on which the placeholder renders; empty means everywhere.
    pub targeting_content_types: BTreeSet<String>,
}

impl AdvertisementSettings {
    /// Resolves the max-age to emit: the override if configured, else the
    /// host default, clamped to a non-negative integer.
    pub fn effective_max_age(&self, host_default: i64) -> u32 {
        let seconds = self.page_cache_max_age.unwrap_or(host_default);
        seconds.clamp(0, i64::from(u32::MAX)) as u32
    }

    pub fn is_targeting_configured(&self) -> bool {
        !self.targeting_content_types.is_empty()
    }

    /// Flattens into the persisted key-value form.
    pub fn to_key_values(&self) -> Vec<(String, Value)> {
        vec![
            (
                CACHE_MAX_AGE_KEY.to_string(),
                self.page_cache_max_age.map(Value::from).unwrap_or(Value::Null),
            ),
            (
                TARGETING_CONTENT_TYPES_KEY.to_string(),
                Value::from(
                    self.targeting_content_types
                        .iter()
                        .cloned()
                        .collect::<Vec<_>>(),
                ),
            ),
        ]
    }

    /// Rebuilds settings from persisted key-value pairs.
    ///
    /// Unknown keys are ignored. The max-age accepts integers, floats and
    /// numeric strings; anything else leaves the override unset.
    pub fn from_key_values<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let mut settings = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                CACHE_MAX_AGE_KEY => settings.page_cache_max_age = coerce_seconds(&value),
                TARGETING_CONTENT_TYPES_KEY => {
                    settings.targeting_content_types = value
                        .as_array()
                        .map(|items| {
                            items
                                .iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default();
                }
                other => tracing::debug!(key = other, "Ignoring unknown advertisement setting"),
            }
        }
        settings
    }
}

fn coerce_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Formats a number of seconds the way the settings form labels periods.
///
/// At most two units are shown, largest first (`"1 hour 30 min"`).
pub fn format_interval(seconds: u32) -> String {
    const UNITS: [(&str, &str, u32); 5] = [
        ("week", "weeks", 604_800),
        ("day", "days", 86_400),
        ("hour", "hours", 3_600),
        ("min", "min", 60),
        ("sec", "sec", 1),
    ];

    let mut remaining = seconds;
    let mut parts = Vec::new();
    for (singular, plural, size) in UNITS {
        if parts.len() == 2 {
            break;
        }
        if remaining >= size {
            let count = remaining / size;
            remaining %= size;
            parts.push(format!(
                "{} {}",
                count,
                if count == 1 { singular } else { plural }
            ));
        }
    }

    if parts.is_empty() {
        "0 sec".to_string()
    } else {
        parts.join(" ")
    }
}

/// One selectable cache period on the settings form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CachePeriodOption {
    pub value: u32,
    pub label: String,
}

/// The selectable cache periods with their labels.
pub fn cache_period_options() -> Vec<CachePeriodOption> {
    CACHE_PERIODS
        .iter()
        .map(|&value| CachePeriodOption {
            value,
            label: if value == 0 {
                "<no caching>".to_string()
            } else {
                format_interval(value)
            },
        })
        .collect()
}

/// Settings form: current values plus the choices the admin may pick from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsFormResponse {
    pub settings: AdvertisementSettings,
    pub host_default_max_age: i64,
    pub effective_max_age: u32,
    pub cache_period_options: Vec<CachePeriodOption>,
}

impl SettingsFormResponse {
    pub fn new(settings: AdvertisementSettings, host_default_max_age: i64) -> Self {
        Self {
            effective_max_age: settings.effective_max_age(host_default_max_age),
            settings,
            host_default_max_age,
            cache_period_options: cache_period_options(),
        }
    }
}

/// Settings validation error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsValidationError {
    #[error("Cache max-age {0} is not one of the offered periods")]
    UnsupportedPeriod(i64),

    #[error("Invalid content type '{0}'")]
    InvalidContentType(String),
}

/// Settings form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    /// `null` or absent clears the override.
    #[serde(default)]
    pub page_cache_max_age: Option<i64>,
    #[serde(default)]
    pub targeting_content_types: Vec<String>,
}

impl UpdateSettingsRequest {
    /// Validates the submission and converts it into settings to persist.
    pub fn into_settings(self) -> Result<AdvertisementSettings, SettingsValidationError> {
        if let Some(max_age) = self.page_cache_max_age {
            let offered = u32::try_from(max_age)
                .map(|v| CACHE_PERIODS.contains(&v))
                .unwrap_or(false);
            if !offered {
                return Err(SettingsValidationError::UnsupportedPeriod(max_age));
            }
        }

        let mut bundles = BTreeSet::new();
        for bundle in self.targeting_content_types {
            let bundle = bundle.trim().to_string();
            if shared::validation::validate_bundle(&bundle).is_err() {
                return Err(SettingsValidationError::InvalidContentType(bundle));
            }
            bundles.insert(bundle);
        }

        Ok(AdvertisementSettings {
            page_cache_max_age: self.page_cache_max_age,
            targeting_content_types: bundles,
        })
    }
}
