//! Integration tests for Zenith.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable PostgreSQL database
//! export ZENITH_TEST_DATABASE_URL=postgres://localhost/zenith_test
//!
//! # Run the ignored database tests
//! cargo test -p zenith-integration-tests -- --ignored
//! ```
//!
//! Every test works on its own freshly generated user id, so tests can run
//! in parallel against one database without cleanup.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use zenith_core::UserId;
use zenith_server::identity::{EmailAddress, IdentityUser};

/// Connect to the test database and apply migrations.
///
/// # Panics
///
/// Panics if `ZENITH_TEST_DATABASE_URL` is unset or the database is unreachable.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("ZENITH_TEST_DATABASE_URL")
        .unwrap_or_else(|_| panic!("ZENITH_TEST_DATABASE_URL must be set"));

    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(&url)
        .await
        .unwrap_or_else(|e| panic!("failed to connect to test database: {e}"));

    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to migrate test database: {e}"));

    pool
}

/// A user id no other test uses.
///
/// # Panics
///
/// Never in practice; generated ids are non-empty.
#[must_use]
pub fn unique_user_id() -> UserId {
    UserId::parse(&format!("user_{}", Uuid::new_v4().simple()))
        .unwrap_or_else(|e| panic!("generated user id rejected: {e}"))
}

/// Identity as the provider would report it for a new user.
#[must_use]
pub fn identity(id: &UserId, first: &str, last: &str, email: &str) -> IdentityUser {
    IdentityUser {
        id: id.clone(),
        first_name: Some(first.to_owned()),
        last_name: Some(last.to_owned()),
        image_url: "https://img.example.com/avatar.png".to_owned(),
        email_addresses: vec![EmailAddress {
            email_address: email.to_owned(),
        }],
    }
}

/// Row counts owned by one profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedCounts {
    pub profiles: i64,
    pub design_systems: i64,
    pub color_tokens: i64,
    pub typography_tokens: i64,
    pub flows: i64,
    pub folders: i64,
    pub files: i64,
}

impl OwnedCounts {
    /// Nothing written for the profile.
    pub const EMPTY: Self = Self {
        profiles: 0,
        design_systems: 0,
        color_tokens: 0,
        typography_tokens: 0,
        flows: 0,
        folders: 0,
        files: 0,
    };

    /// What one provisioning with the Zenith seed leaves behind.
    pub const SEEDED: Self = Self {
        profiles: 1,
        design_systems: 1,
        color_tokens: 10,
        typography_tokens: 2,
        flows: 1,
        folders: 1,
        files: 1,
    };
}

/// Count every record owned by `id`.
///
/// # Panics
///
/// Panics if a count query fails.
pub async fn owned_counts(pool: &PgPool, id: &UserId) -> OwnedCounts {
    let count = |sql: &'static str| {
        let id = id.as_str().to_owned();
        async move {
            sqlx::query_scalar::<_, i64>(sql)
                .bind(id)
                .fetch_one(pool)
                .await
                .unwrap_or_else(|e| panic!("count failed ({sql}): {e}"))
        }
    };

    OwnedCounts {
        profiles: count("SELECT COUNT(*) FROM zenith.profile WHERE id = $1").await,
        design_systems: count("SELECT COUNT(*) FROM zenith.design_system WHERE profile_id = $1")
            .await,
        color_tokens: count(
            "SELECT COUNT(*) FROM zenith.color_token c \
             JOIN zenith.design_system d ON d.id = c.design_system_id WHERE d.profile_id = $1",
        )
        .await,
        typography_tokens: count(
            "SELECT COUNT(*) FROM zenith.typography_token t \
             JOIN zenith.design_system d ON d.id = t.design_system_id WHERE d.profile_id = $1",
        )
        .await,
        flows: count("SELECT COUNT(*) FROM zenith.flow WHERE profile_id = $1").await,
        folders: count("SELECT COUNT(*) FROM zenith.folder WHERE profile_id = $1").await,
        files: count("SELECT COUNT(*) FROM zenith.file WHERE profile_id = $1").await,
    }
}
