//! Domain services for the advertisement service.
//!
//! Services contain business logic that operates on domain models and
//! never touch storage directly.

pub mod placeholder;
pub mod render;
pub mod selection;

pub use placeholder::{HtmlIdGenerator, PlaceholderBlock, PlaceholderBlockConfig, PlaceholderBuild};
pub use render::render_advertisement;
pub use selection::{pick_uniform, AdSelector};
