//! Session identity extractors.
//!
//! The session only stores the identity provider's user id
//! ([`SessionIdentity`]); handlers turn it into a [`RequestIdentity`] to
//! reach the provider.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use zenith_core::UserId;

use crate::models::{SessionIdentity, session_keys};

/// Extractor that requires a signed-in user.
///
/// API requests are rejected with 401, page requests are redirected to
/// sign-in.
pub struct RequireIdentity(pub UserId);

/// Rejection for [`RequireIdentity`].
pub enum IdentityRejection {
    /// Redirect to sign-in (for page requests).
    RedirectToSignIn,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToSignIn => Redirect::to("/auth/sign-in").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalIdentity(user_id) = OptionalIdentity::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalIdentity(None));

        user_id.map(Self).ok_or_else(|| {
            if parts.uri.path().starts_with("/api/") {
                IdentityRejection::Unauthorized
            } else {
                IdentityRejection::RedirectToSignIn
            }
        })
    }
}

/// Extractor that reads the signed-in user's id, if any.
///
/// A missing session layer or an unreadable session counts as signed out.
pub struct OptionalIdentity(pub Option<UserId>);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        let identity = session
            .get::<SessionIdentity>(session_keys::IDENTITY)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "unreadable session identity"))
            .ok()
            .flatten();

        Ok(Self(identity.map(|identity| identity.user_id)))
    }
}

/// Store the signed-in user in the session.
///
/// Cycles the session id first so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    user_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::IDENTITY, SessionIdentity { user_id })
        .await
}

/// Remove the signed-in user from the session (sign-out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<SessionIdentity>(session_keys::IDENTITY)
        .await?;
    Ok(())
}

/// Read and remove the pending OAuth `state` (one-time use).
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn take_oauth_state(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(session_keys::OAUTH_STATE).await
}
