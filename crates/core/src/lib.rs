//! Zenith Core - Shared types library.
//!
//! This crate provides the domain types used across all Zenith components:
//! - `server` - The web backend that owns profile bootstrap and lookup
//! - `cli` - Command-line tools for migrations and profile management
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is opt-in via the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, and design token values

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
