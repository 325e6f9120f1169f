//! Domain models for the Zenith server.
//!
//! These are validated domain objects, separate from the database row types
//! in [`crate::db`].

pub mod profile;
pub mod session;
pub mod workspace;

pub use profile::{NewProfile, Profile, ProfileWorkspace};
pub use session::{SessionIdentity, keys as session_keys};
pub use workspace::{
    ColorToken, DesignSystem, DesignSystemWithTokens, File, Flow, Folder, TypographyToken,
};
