//! CLI subcommands.

pub mod migrate;
pub mod profile;

use secrecy::SecretString;

/// Database URL from `ZENITH_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var("ZENITH_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
