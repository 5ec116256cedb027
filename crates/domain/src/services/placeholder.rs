//! Placeholder block: the `<ad-content>` marker the client fetcher hydrates.

use std::collections::HashMap;

use shared::html::escape_attr;

use crate::models::{AdvertisementSettings, CacheMetadata};

/// Element name of the placeholder marker.
pub const PLACEHOLDER_TAG: &str = "ad-content";

/// Base DOM id for placeholders.
pub const PLACEHOLDER_BASE_ID: &str = "advertisement";

/// Path the client fetcher script is served from.
pub const CLIENT_SCRIPT_PATH: &str = "/advertisement/advertisement.js";

/// Most placeholders a single block render may emit.
pub const MAX_SLOTS: usize = 10;

/// Hands out DOM ids that are unique within one page.
///
/// The first request for a base id returns it unchanged; later requests
/// return `base--2`, `base--3`, and so on.
#[derive(Debug, Default)]
pub struct HtmlIdGenerator {
    seen: HashMap<String, usize>,
}

impl HtmlIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique_id(&mut self, base: &str) -> String {
        let base = clean_id(base);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}--{}", base, count)
        }
    }
}

/// Lowercases and replaces anything outside `[a-z0-9_-]` with `-`.
fn clean_id(id: &str) -> String {
    let cleaned: String = id
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        PLACEHOLDER_BASE_ID.to_string()
    } else {
        cleaned
    }
}

/// Per-placement block configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderBlockConfig {
    pub category: Option<String>,
}

/// Output of a block build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBuild {
    /// Placeholder markers plus the script reference; empty when not eligible.
    pub markup: String,
    /// DOM ids handed out, in document order.
    pub ids: Vec<String>,
    pub cache: CacheMetadata,
}

impl PlaceholderBuild {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Decides placement and emits placeholder markup for one page view.
#[derive(Debug, Clone)]
pub struct PlaceholderBlock<'a> {
    settings: &'a AdvertisementSettings,
    config: PlaceholderBlockConfig,
}

impl<'a> PlaceholderBlock<'a> {
    pub fn new(settings: &'a AdvertisementSettings, config: PlaceholderBlockConfig) -> Self {
        Self { settings, config }
    }

    /// Whether the block renders on a page of the given bundle.
    ///
    /// Pages that are not content items (`None`) and sites without
    /// targeting always get the placeholder.
    pub fn is_eligible(&self, bundle: Option<&str>) -> bool {
        match bundle {
            Some(bundle) if self.settings.is_targeting_configured() => {
                self.settings.targeting_content_types.contains(bundle)
            }
            _ => true,
        }
    }

    /// Builds `slots` placeholders (clamped to `1..=MAX_SLOTS`).
    pub fn build(
        &self,
        bundle: Option<&str>,
        slots: usize,
        base_id: &str,
        ids: &mut HtmlIdGenerator,
        host_default_max_age: i64,
    ) -> PlaceholderBuild {
        let cache = CacheMetadata::for_url(self.settings.effective_max_age(host_default_max_age));

        if !self.is_eligible(bundle) {
            tracing::debug!(bundle = ?bundle, "Placeholder not eligible for bundle");
            return PlaceholderBuild {
                markup: String::new(),
                ids: Vec::new(),
                cache,
            };
        }

        let category_attr = self
            .config
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!(r#" data-category="{}""#, escape_attr(c)))
            .unwrap_or_default();

        let mut markup = String::new();
        let mut handed_out = Vec::new();
        for _ in 0..slots.clamp(1, MAX_SLOTS) {
            let id = ids.unique_id(base_id);
            markup.push_str(&format!(
                r#"<{tag} id="{id}"{category}></{tag}>"#,
                tag = PLACEHOLDER_TAG,
                id = escape_attr(&id),
                category = category_attr,
            ));
            handed_out.push(id);
        }
        markup.push_str(&format!(
            r#"<script src="{}" defer></script>"#,
            CLIENT_SCRIPT_PATH
        ));

        PlaceholderBuild {
            markup,
            ids: handed_out,
            cache,
        }
    }
}
