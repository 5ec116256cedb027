//! Shared utilities and common types for the advertisement service.
//!
//! This crate provides common functionality used across all other crates:
//! - Admin key hashing
//! - HTML escaping for rendered fragments
//! - Cursor pagination for admin listings
//! - Common validation logic

pub mod crypto;
pub mod html;
pub mod pagination;
pub mod validation;
