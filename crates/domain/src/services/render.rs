//! Rendering of an advertisement into a self-contained HTML fragment.

use shared::html::{escape_attr, escape_text};

use crate::models::Advertisement;

/// Renders an advertisement as linked image plus title.
pub fn render_advertisement(ad: &Advertisement) -> String {
    format!(
        concat!(
            r#"<article class="advertisement" data-advertisement="{uuid}">"#,
            r#"<a class="advertisement__link" href="{href}" rel="nofollow noopener" target="_blank">"#,
            r#"<img class="advertisement__image" src="{src}" alt="{alt}" loading="lazy">"#,
            r#"<span class="advertisement__title">{title}</span>"#,
            "</a></article>"
        ),
        uuid = ad.uuid,
        href = escape_attr(ad.target_url.trim()),
        src = escape_attr(ad.image_ref.trim()),
        alt = escape_attr(ad.alt_text()),
        title = escape_text(&ad.title),
    )
}
