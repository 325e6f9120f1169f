//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before the response is written; clients only ever see
//! a generic message for them.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::identity::IdentityError;
use crate::services::profile::ProfileError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Profile lookup or provisioning failed.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Identity provider request failed outside of the profile service.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Session store read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Profile(err) => match err {
                ProfileError::Identity(_) => StatusCode::BAD_GATEWAY,
                ProfileError::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
                ProfileError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ProfileError::EmptyEmailList(_) | ProfileError::InvalidEmail(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            Self::Identity(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether this error is our fault and worth reporting.
    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Profile(ProfileError::Identity(_)) | Self::Identity(_) => {
                "Identity provider unavailable".to_string()
            }
            Self::Profile(ProfileError::Repository(RepositoryError::Conflict(_))) => {
                "Profile is being created, please retry".to_string()
            }
            Self::Profile(ProfileError::EmptyEmailList(_)) => {
                "Your account has no email address".to_string()
            }
            Self::Profile(ProfileError::InvalidEmail(_)) => {
                "Your account email address is invalid".to_string()
            }
            Self::Profile(_) | Self::Session(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
