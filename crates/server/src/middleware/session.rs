//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! cookie is signed with `ZENITH_SESSION_SECRET`; a cookie whose signature
//! does not verify is treated as absent.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::{Key, KeyError};
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "zenith_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The `tower_sessions.session` table is created by migration, not here.
///
/// # Errors
///
/// Returns [`KeyError`] if the session secret is shorter than 64 bytes.
pub fn create_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> Result<SessionManagerLayer<PostgresStore, SignedCookie>, KeyError> {
    configure(PostgresStore::new(pool.clone()), config)
}

/// Apply cookie settings to a session layer over any store.
///
/// # Errors
///
/// Returns [`KeyError`] if the session secret is shorter than 64 bytes.
pub fn configure<S: SessionStore + Clone>(
    store: S,
    config: &ServerConfig,
) -> Result<SessionManagerLayer<S, SignedCookie>, KeyError> {
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}

#[cfg(test)]
mod tests {
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::routes::test_support::config;

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = config("https://accounts.identity.test");
        config.session_secret = "s".repeat(32).into();

        assert!(configure(MemoryStore::default(), &config).is_err());
    }
}
