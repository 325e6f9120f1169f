//! Profile service error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::identity::IdentityError;

/// Errors that can occur during profile lookup or provisioning.
///
/// "Not signed in" is not an error; it is reported through return values.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The identity provider could not be reached or answered badly.
    #[error("identity provider error: {0}")]
    Identity(#[from] IdentityError),

    /// Repository/database error, including aborted provisioning transactions.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The identity has no email address to copy onto the profile.
    #[error("identity {0} has no email address")]
    EmptyEmailList(String),

    /// The identity's first email address is malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] zenith_core::EmailError),
}
