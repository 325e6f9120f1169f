//! Profile service.
//!
//! Resolves the signed-in user's profile and provisions one, with its default
//! workspace, the first time a user signs in.

mod error;

pub use error::ProfileError;

use zenith_core::{Email, UserId};

use crate::db::ProfileStore;
use crate::identity::{Authentication, IdentityProvider, IdentityUser};
use crate::models::{NewProfile, Profile, ProfileWorkspace};
use crate::seed::{WorkspaceSeed, ZENITH};

/// Result of [`ProfileService::initial_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialProfile {
    /// The user already had a profile; nothing was written.
    Existing(Profile),
    /// A profile and its default workspace were created.
    Created(Profile),
    /// Nobody is signed in. The caller decides how to send the user to sign-in.
    SignInRequired,
}

impl InitialProfile {
    /// The profile, unless sign-in is required.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Existing(profile) | Self::Created(profile) => Some(profile),
            Self::SignInRequired => None,
        }
    }

    /// Consume the outcome and return the profile, unless sign-in is required.
    #[must_use]
    pub fn into_profile(self) -> Option<Profile> {
        match self {
            Self::Existing(profile) | Self::Created(profile) => Some(profile),
            Self::SignInRequired => None,
        }
    }
}

/// Profile lookup and provisioning over a [`ProfileStore`].
pub struct ProfileService<'a, S> {
    store: &'a S,
    seed: &'a WorkspaceSeed,
}

impl<'a, S: ProfileStore> ProfileService<'a, S> {
    /// Create a service that seeds new profiles with the Zenith workspace.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            store,
            seed: &ZENITH,
        }
    }

    /// The signed-in user's profile with favorite folders and design systems.
    ///
    /// Returns `Ok(None)` without touching the database when nobody is signed
    /// in, and `Ok(None)` when the user has no profile yet.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Identity` if the session cannot be resolved, or
    /// `ProfileError::Repository` if the query fails.
    pub async fn current_profile<I: IdentityProvider>(
        &self,
        identity: &I,
    ) -> Result<Option<ProfileWorkspace>, ProfileError> {
        let Some(user_id) = identity.session_user_id().await? else {
            return Ok(None);
        };

        self.workspace(&user_id).await
    }

    /// A profile with favorite folders and design systems, by user id.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Repository` if the query fails.
    pub async fn workspace(&self, user_id: &UserId) -> Result<Option<ProfileWorkspace>, ProfileError> {
        Ok(self.store.find_profile_workspace(user_id).await?)
    }

    /// The signed-in user's profile, created with its default workspace if
    /// this is the user's first sign-in.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Identity` if the provider lookup fails,
    /// `ProfileError::EmptyEmailList` or `ProfileError::InvalidEmail` if the
    /// identity cannot populate a profile, and `ProfileError::Repository` if
    /// the lookup or the provisioning transaction fails. A failed transaction
    /// leaves no records behind.
    pub async fn initial_profile<I: IdentityProvider>(
        &self,
        identity: &I,
    ) -> Result<InitialProfile, ProfileError> {
        match identity.current_user().await? {
            Authentication::Unauthenticated => Ok(InitialProfile::SignInRequired),
            Authentication::Authenticated(user) => self.provision(&user).await,
        }
    }

    /// Return the profile for `user`, creating it if missing.
    ///
    /// # Errors
    ///
    /// See [`ProfileService::initial_profile`].
    pub async fn provision(&self, user: &IdentityUser) -> Result<InitialProfile, ProfileError> {
        if let Some(profile) = self.store.find_profile(&user.id).await? {
            return Ok(InitialProfile::Existing(profile));
        }

        let new_profile = new_profile_from_identity(user)?;
        let profile = self
            .store
            .create_profile_with_seed(&new_profile, self.seed)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id = %user.id, error = %e, "profile provisioning failed");
            })?;

        tracing::info!(
            user_id = %profile.id,
            design_system = self.seed.design_system_name,
            "provisioned new profile"
        );
        Ok(InitialProfile::Created(profile))
    }
}

/// Build the profile row for a first sign-in.
///
/// # Errors
///
/// Returns `ProfileError::EmptyEmailList` if the identity lists no email
/// address and `ProfileError::InvalidEmail` if the first one is malformed.
pub fn new_profile_from_identity(user: &IdentityUser) -> Result<NewProfile, ProfileError> {
    let raw_email = user
        .first_email()
        .ok_or_else(|| ProfileError::EmptyEmailList(user.id.to_string()))?;

    Ok(NewProfile {
        id: user.id.clone(),
        name: user.full_name(),
        image_url: user.image_url.clone(),
        email: Email::parse(raw_email)?,
    })
}
