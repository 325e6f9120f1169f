//! Database operations for the Zenith `PostgreSQL` database.
//!
//! ## Tables (schema `zenith`)
//!
//! - `profile` - One row per identity provider user, keyed by provider user id
//! - `design_system`, `color_token`, `typography_token` - Design tokens
//! - `flow` - Workflow canvases bound to a design system
//! - `folder`, `file` - Profile file tree
//!
//! Sessions live in `tower_sessions.session`.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p zenith-cli -- migrate
//! ```

pub mod profiles;

#[cfg(any(test, feature = "test-util"))]
pub mod memory;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use zenith_core::UserId;

use crate::models::{NewProfile, Profile, ProfileWorkspace};
use crate::seed::WorkspaceSeed;

pub use profiles::ProfileRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., a profile already exists for the user).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations the profile service depends on.
///
/// [`ProfileRepository`] is the `PostgreSQL` implementation.
pub trait ProfileStore: Send + Sync {
    /// Get a profile without relations.
    fn find_profile(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<Profile>, RepositoryError>> + Send;

    /// Get a profile with its favorite folders and its design systems
    /// (including color and typography tokens).
    fn find_profile_workspace(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<ProfileWorkspace>, RepositoryError>> + Send;

    /// Create a profile and its seeded workspace atomically.
    ///
    /// Either every record is committed or none is.
    fn create_profile_with_seed(
        &self,
        profile: &NewProfile,
        seed: &WorkspaceSeed,
    ) -> impl Future<Output = Result<Profile, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to [`RepositoryError::Conflict`].
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(err)
}
