//! Core types for Zenith.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod email;
pub mod id;

pub use color::{ColorError, HexColor, Opacity};
pub use email::{Email, EmailError};
pub use id::*;
