//! Zenith CLI - Database migrations and profile management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! zenith migrate
//!
//! # Print a profile with its favorite folders and design systems
//! zenith profile show --user-id user_2abc
//!
//! # Provision a profile without going through sign-in
//! zenith profile provision --user-id user_2abc --first-name Ada \
//!     --last-name Lovelace --email ada@example.com
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zenith")]
#[command(author, version, about = "Zenith CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect and provision profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print a profile as JSON
    Show {
        /// Identity provider user id
        #[arg(short, long)]
        user_id: String,
    },
    /// Create a profile and its default workspace if missing
    Provision {
        /// Identity provider user id
        #[arg(short, long)]
        user_id: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Email address copied onto the profile
        #[arg(short, long)]
        email: String,

        /// Avatar URL
        #[arg(long, default_value = "")]
        image_url: String,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zenith=info,zenith_server=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Profile { action } => match action {
            ProfileAction::Show { user_id } => commands::profile::show(&user_id).await?,
            ProfileAction::Provision {
                user_id,
                first_name,
                last_name,
                email,
                image_url,
            } => {
                commands::profile::provision(commands::profile::ProvisionArgs {
                    user_id,
                    first_name,
                    last_name,
                    email,
                    image_url,
                })
                .await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_provision() {
        let cli = Cli::try_parse_from([
            "zenith",
            "profile",
            "provision",
            "--user-id",
            "user_1",
            "--first-name",
            "Ada",
            "--email",
            "ada@example.com",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let Commands::Profile {
            action:
                ProfileAction::Provision {
                    user_id,
                    first_name,
                    last_name,
                    image_url,
                    ..
                },
        } = cli.command
        else {
            panic!("expected profile provision");
        };
        assert_eq!(user_id, "user_1");
        assert_eq!(first_name.as_deref(), Some("Ada"));
        assert_eq!(last_name, None);
        assert_eq!(image_url, "");
    }
}
