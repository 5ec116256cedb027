//! Request-level services shared by the route handlers.

pub mod impression;

pub use impression::{load_settings_or_default, select_advertisement};
