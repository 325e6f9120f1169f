//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! GET  /auth/sign-in           - Redirect to the identity provider
//! GET  /auth/callback          - OAuth callback, stores the session identity
//! POST /auth/sign-out          - Clear the session identity
//!
//! # Profile
//! GET  /setup                  - Profile of the signed-in user, provisioned on first visit
//! GET  /api/profile            - Profile with favorite folders and design systems
//! ```

pub mod auth;
pub mod profile;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in))
        .route("/callback", get(auth::callback))
        .route("/sign-out", post(auth::sign_out))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .route("/setup", get(profile::setup))
        .route("/api/profile", get(profile::api_profile))
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::postgres::PgPoolOptions;
    use tower_sessions::MemoryStore;

    use super::*;
    use crate::config::{IdentityConfig, SentryConfig, ServerConfig};
    use crate::middleware::session;

    /// Config pointing the identity provider at `identity_url`.
    pub fn config(identity_url: &str) -> ServerConfig {
        ServerConfig {
            database_url: "postgres://localhost/zenith_unused".to_owned().into(),
            host: std::net::IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            session_secret: "s".repeat(64).into(),
            identity: IdentityConfig {
                api_url: identity_url.to_owned(),
                secret_key: "sk_test_Zq8Xw2Lr5Tn1Vb7Mc4".to_owned().into(),
                issuer_url: identity_url.to_owned(),
                client_id: "client_abc".to_owned(),
                client_secret: "cs_test_Hp3Kd9Wf6Qa2Ys8Ju1".to_owned().into(),
            },
            sentry: SentryConfig::default(),
        }
    }

    /// Full router over an in-memory session store and a pool that never
    /// connects. Requests that reach the database fail with 500.
    pub fn app(identity_url: &str) -> Router {
        let config = config(identity_url);
        let pool = PgPoolOptions::new()
            .acquire_timeout(std::time::Duration::from_millis(200))
            .connect_lazy("postgres://127.0.0.1:9/zenith_unused")
            .unwrap_or_else(|e| panic!("lazy pool: {e}"));
        let session_layer = session::configure(MemoryStore::default(), &config)
            .unwrap_or_else(|e| panic!("session key: {e}"));

        routes()
            .layer(session_layer)
            .with_state(AppState::new(config, pool))
    }
}
