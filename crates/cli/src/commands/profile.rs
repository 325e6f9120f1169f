//! Profile commands.
//!
//! `provision` goes through the same service as the `/setup` route, with the
//! identity built from command-line arguments instead of the provider.

use thiserror::Error;

use zenith_core::{UserId, UserIdError};
use zenith_server::db::{self, ProfileRepository};
use zenith_server::identity::{EmailAddress, IdentityUser};
use zenith_server::services::profile::{InitialProfile, ProfileError, ProfileService};

/// Errors that can occur during profile commands.
#[derive(Debug, Error)]
pub enum ProfileCommandError {
    #[error("Missing environment variable: ZENITH_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid user id: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("No profile for user {0}")]
    NotFound(UserId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arguments of `zenith profile provision`.
#[derive(Debug)]
pub struct ProvisionArgs {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub image_url: String,
}

impl ProvisionArgs {
    fn into_identity(self) -> Result<IdentityUser, UserIdError> {
        Ok(IdentityUser {
            id: UserId::parse(&self.user_id)?,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url,
            email_addresses: vec![EmailAddress {
                email_address: self.email,
            }],
        })
    }
}

async fn connect() -> Result<sqlx::PgPool, ProfileCommandError> {
    let database_url = super::database_url().ok_or(ProfileCommandError::MissingDatabaseUrl)?;
    Ok(db::create_pool(&database_url).await?)
}

/// Print a profile with favorite folders and design systems.
///
/// # Errors
///
/// Returns `ProfileCommandError::NotFound` if the user has no profile.
pub async fn show(user_id: &str) -> Result<(), ProfileCommandError> {
    let user_id = UserId::parse(user_id)?;
    let pool = connect().await?;
    let repo = ProfileRepository::new(&pool);

    let workspace = ProfileService::new(&repo)
        .workspace(&user_id)
        .await?
        .ok_or(ProfileCommandError::NotFound(user_id))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&workspace)?);
    }
    Ok(())
}

/// Provision a profile and its default workspace.
///
/// # Errors
///
/// Returns `ProfileCommandError` if the arguments are invalid or the
/// provisioning transaction fails.
pub async fn provision(args: ProvisionArgs) -> Result<(), ProfileCommandError> {
    let identity = args.into_identity()?;
    let pool = connect().await?;
    let repo = ProfileRepository::new(&pool);

    let outcome = ProfileService::new(&repo).provision(&identity).await?;
    let created = matches!(outcome, InitialProfile::Created(_));
    let Some(profile) = outcome.profile() else {
        return Ok(());
    };

    if created {
        tracing::info!(user_id = %profile.id, "profile created");
    } else {
        tracing::info!(user_id = %profile.id, "profile already exists, nothing written");
    }
    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(profile)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provision_args_become_identity() {
        let identity = ProvisionArgs {
            user_id: " user_1 ".to_owned(),
            first_name: Some("Ada".to_owned()),
            last_name: None,
            email: "ada@example.com".to_owned(),
            image_url: String::new(),
        }
        .into_identity()
        .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(identity.id.as_str(), "user_1");
        assert_eq!(identity.full_name(), "Ada");
        assert_eq!(identity.first_email(), Some("ada@example.com"));
    }

    #[test]
    fn test_blank_user_id_is_rejected() {
        let args = ProvisionArgs {
            user_id: "  ".to_owned(),
            first_name: None,
            last_name: None,
            email: "ada@example.com".to_owned(),
            image_url: String::new(),
        };
        assert!(args.into_identity().is_err());
    }
}
