//! Profile domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use zenith_core::{Email, UserId};

use super::workspace::{DesignSystemWithTokens, Folder};

/// The application's record of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Identity provider user id; also the primary key.
    pub id: UserId,
    /// Display name ("first last").
    pub name: String,
    /// Avatar URL reported by the identity provider.
    pub image_url: String,
    /// Email address captured at provisioning time.
    pub email: Email,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Values needed to insert a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub id: UserId,
    pub name: String,
    pub image_url: String,
    pub email: Email,
}

/// A profile hydrated with the data the workspace shell renders on load:
/// favorite folders and every design system with its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileWorkspace {
    #[serde(flatten)]
    pub profile: Profile,
    /// Folders with `is_favorite = true`, ordered by id.
    pub folders: Vec<Folder>,
    /// Design systems owned by the profile, ordered by id.
    pub design_systems: Vec<DesignSystemWithTokens>,
}
