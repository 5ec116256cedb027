//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a placeholder DOM id.
pub const MAX_HTML_ID_LENGTH: usize = 128;

/// Maximum length of a content-type bundle machine name.
pub const MAX_BUNDLE_LENGTH: usize = 32;

/// Image file extensions accepted for advertisement images.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

lazy_static::lazy_static! {
    static ref HTML_ID_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_\-:.]+$").unwrap();
    static ref BUNDLE_REGEX: regex::Regex = regex::Regex::new(r"^[a-z0-9_]+$").unwrap();
    static ref ABSOLUTE_URL_REGEX: regex::Regex =
        regex::Regex::new(r"^https?://[A-Za-z0-9\-._~%]+(:\d+)?(/\S*)?$").unwrap();
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Validates a placeholder DOM id as sent by the client fetcher.
///
/// Ids starting with `#` would collide with the response metadata keys.
pub fn validate_html_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(error("html_id_empty", "Placeholder id must not be empty"));
    }
    if id.len() > MAX_HTML_ID_LENGTH {
        return Err(error(
            "html_id_length",
            "Placeholder id must be at most 128 characters",
        ));
    }
    if !HTML_ID_REGEX.is_match(id) {
        return Err(error(
            "html_id_format",
            "Placeholder id may only contain letters, digits, '-', '_', ':' and '.'",
        ));
    }
    Ok(())
}

/// Validates an advertisement target URL.
///
/// Accepts absolute `http`/`https` URLs and site-relative paths (`/promo`).
/// Protocol-relative (`//host`) and other schemes are rejected.
pub fn validate_target_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(error("url_empty", "Target URL is required"));
    }
    if url.starts_with('/') && !url.starts_with("//") {
        if url.chars().any(char::is_whitespace) {
            return Err(error("url_format", "Target URL must not contain whitespace"));
        }
        return Ok(());
    }
    if ABSOLUTE_URL_REGEX.is_match(url) {
        Ok(())
    } else {
        Err(error(
            "url_format",
            "Target URL must be an http(s) URL or a path starting with '/'",
        ))
    }
}

/// Validates an image reference by its file extension.
pub fn validate_image_ref(image_ref: &str) -> Result<(), ValidationError> {
    let path = image_ref
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    if path.is_empty() {
        return Err(error("image_empty", "Image reference is required"));
    }

    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(error(
            "image_extension",
            "Image must be a png, jpg or jpeg file",
        ))
    }
}

/// Validates a content-type bundle machine name (e.g. `article`).
pub fn validate_bundle(bundle: &str) -> Result<(), ValidationError> {
    if bundle.is_empty() || bundle.len() > MAX_BUNDLE_LENGTH || !BUNDLE_REGEX.is_match(bundle) {
        return Err(error(
            "bundle_format",
            "Content type must be 1-32 lowercase letters, digits or underscores",
        ));
    }
    Ok(())
}
