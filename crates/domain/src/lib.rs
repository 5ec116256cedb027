//! Domain layer for the advertisement service.
//!
//! This crate contains:
//! - Domain models (Advertisement, settings, cache metadata)
//! - Pure business logic: random selection, ad rendering, placeholder blocks

pub mod models;
pub mod services;
