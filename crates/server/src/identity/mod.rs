//! Identity provider integration.
//!
//! The profile service never talks to the provider directly. It asks an
//! [`IdentityProvider`] two questions: who is signed in on this session, and
//! what does the provider know about that user. [`RequestIdentity`] answers
//! both for an HTTP request from the session cookie and [`IdentityClient`].

mod client;
mod error;

pub use client::{AccessToken, IdentityClient};
pub use error::IdentityError;

use std::future::Future;

use serde::Deserialize;

use zenith_core::UserId;

/// One of a user's email addresses as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

/// Profile attributes the provider holds for a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityUser {
    pub id: UserId,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

impl IdentityUser {
    /// First and last name joined by a space, skipping missing parts.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The first listed email address, if any.
    #[must_use]
    pub fn first_email(&self) -> Option<&str> {
        self.email_addresses
            .first()
            .map(|address| address.email_address.as_str())
    }
}

/// Outcome of resolving the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    Authenticated(IdentityUser),
    Unauthenticated,
}

/// Source of the ambient identity for one request.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user's id, without contacting the provider.
    fn session_user_id(&self) -> impl Future<Output = Result<Option<UserId>, IdentityError>> + Send;

    /// The signed-in user's attributes, fetched from the provider.
    fn current_user(&self) -> impl Future<Output = Result<Authentication, IdentityError>> + Send;
}

/// Identity of one HTTP request: the user id stored in the session plus the
/// provider client used to look up attributes.
pub struct RequestIdentity<'a> {
    user_id: Option<UserId>,
    client: &'a IdentityClient,
}

impl<'a> RequestIdentity<'a> {
    #[must_use]
    pub const fn new(user_id: Option<UserId>, client: &'a IdentityClient) -> Self {
        Self { user_id, client }
    }
}

impl IdentityProvider for RequestIdentity<'_> {
    async fn session_user_id(&self) -> Result<Option<UserId>, IdentityError> {
        Ok(self.user_id.clone())
    }

    async fn current_user(&self) -> Result<Authentication, IdentityError> {
        let Some(user_id) = &self.user_id else {
            return Ok(Authentication::Unauthenticated);
        };

        Ok(self
            .client
            .get_user(user_id)
            .await?
            .map_or(Authentication::Unauthenticated, Authentication::Authenticated))
    }
}
