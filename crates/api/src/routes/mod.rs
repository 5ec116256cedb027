//! HTTP route handlers.

pub mod advertisements;
pub mod assets;
pub mod health;
pub mod placeholder;
pub mod render;
pub mod settings;
