//! Business logic services.
//!
//! # Services
//!
//! - `profile` - Current-profile lookup and first-login provisioning

pub mod profile;
