//! Cache metadata attached to rendered responses.

use serde::{Deserialize, Serialize};

/// Cache context meaning "varies by full request URL".
pub const CACHE_CONTEXT_URL: &str = "url";

/// Cacheability of a rendered advertisement or placeholder.
///
/// Serialized as `{"max-age": N, "contexts": ["url"]}` inside the render
/// response under the `#cache` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    #[serde(rename = "max-age")]
    pub max_age: u32,
    pub contexts: Vec<String>,
}

impl CacheMetadata {
    /// Metadata for output that varies by URL only.
    pub fn for_url(max_age: u32) -> Self {
        Self {
            max_age,
            contexts: vec![CACHE_CONTEXT_URL.to_string()],
        }
    }

    /// Value for the `Cache-Control` response header.
    pub fn cache_control(&self) -> String {
        if self.max_age == 0 {
            "no-cache, must-revalidate, private".to_string()
        } else {
            format!("public, max-age={}", self.max_age)
        }
    }
}
