//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use zenith_core::UserId;

/// Session-stored identity.
///
/// Only the provider's user id is kept; profile attributes are fetched from
/// the identity provider when a profile has to be provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    /// Identity provider user id.
    pub user_id: UserId,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for the signed-in identity.
    pub const IDENTITY: &str = "identity";

    /// Key for the OAuth `state` parameter (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";
}
