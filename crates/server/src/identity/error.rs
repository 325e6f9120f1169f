//! Identity provider error types.

use thiserror::Error;

/// Errors returned by the identity provider client.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Transport-level failure (DNS, TLS, timeout, body read).
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected status code.
    #[error("identity provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// An endpoint URL could not be built.
    #[error("invalid identity provider url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The provider returned a user id we cannot store.
    #[error("invalid user id from identity provider: {0}")]
    InvalidUserId(#[from] zenith_core::UserIdError),

    /// The OAuth exchange was rejected or incomplete.
    #[error("oauth error: {0}")]
    OAuth(String),
}
