//! Profile provisioning and lookup against a real database.
//!
//! These tests require a running `PostgreSQL` database reachable through
//! `ZENITH_TEST_DATABASE_URL`.
//!
//! Run with: cargo test -p zenith-integration-tests -- --ignored

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use zenith_integration_tests::{
    OwnedCounts, identity, owned_counts, test_pool, unique_user_id,
};
use zenith_core::Email;
use zenith_server::db::{ProfileRepository, ProfileStore, RepositoryError};
use zenith_server::models::NewProfile;
use zenith_server::seed::{FileSeed, WorkspaceSeed, ZENITH};
use zenith_server::services::profile::{InitialProfile, ProfileError, ProfileService};

#[tokio::test]
#[ignore = "Requires running PostgreSQL (ZENITH_TEST_DATABASE_URL)"]
async fn test_first_login_seeds_workspace() {
    let pool = test_pool().await;
    let repo = ProfileRepository::new(&pool);
    let user_id = unique_user_id();
    let user = identity(&user_id, "Ada", "Lovelace", "ada@example.com");

    let outcome = ProfileService::new(&repo).provision(&user).await.unwrap();

    let InitialProfile::Created(profile) = outcome else {
        panic!("expected a new profile, got {outcome:?}");
    };
    assert_eq!(profile.id, user_id);
    assert_eq!(profile.name, "Ada Lovelace");
    assert_eq!(profile.email.as_str(), "ada@example.com");
    assert_eq!(profile.image_url, "https://img.example.com/avatar.png");
    assert_eq!(owned_counts(&pool, &user_id).await, OwnedCounts::SEEDED);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (ZENITH_TEST_DATABASE_URL)"]
async fn test_second_login_writes_nothing() {
    let pool = test_pool().await;
    let repo = ProfileRepository::new(&pool);
    let service = ProfileService::new(&repo);
    let user_id = unique_user_id();
    let user = identity(&user_id, "Ada", "Lovelace", "ada@example.com");

    let first = service.provision(&user).await.unwrap();
    let renamed = identity(&user_id, "Augusta", "King", "augusta@example.com");
    let second = service.provision(&renamed).await.unwrap();

    assert!(matches!(second, InitialProfile::Existing(_)));
    assert_eq!(first.profile(), second.profile());
    assert_eq!(owned_counts(&pool, &user_id).await, OwnedCounts::SEEDED);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (ZENITH_TEST_DATABASE_URL)"]
async fn test_workspace_lookup_hydrates_seed() {
    let pool = test_pool().await;
    let repo = ProfileRepository::new(&pool);
    let service = ProfileService::new(&repo);
    let user_id = unique_user_id();

    assert!(service.workspace(&user_id).await.unwrap().is_none());

    service
        .provision(&identity(&user_id, "Grace", "Hopper", "grace@example.com"))
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO zenith.folder (profile_id, name, path, is_favorite) VALUES ($1, 'Archive', '/Archive', FALSE)",
    )
    .bind(user_id.as_str())
    .execute(&pool)
    .await
    .unwrap();

    let workspace = service.workspace(&user_id).await.unwrap().unwrap();

    let folders: Vec<_> = workspace.folders.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(folders, ["/Desktop"]);
    assert_eq!(workspace.design_systems.len(), 1);
    let design_system = &workspace.design_systems[0];
    assert_eq!(design_system.design_system.name, "Zenith");
    assert_eq!(design_system.color_tokens.len(), 10);
    assert_eq!(design_system.typography_tokens.len(), 2);
    assert!(
        design_system
            .color_tokens
            .iter()
            .any(|t| t.name == "Underlying BG" && t.value.as_str() == "#292929")
    );

    let json = serde_json::to_value(&workspace).unwrap();
    assert_eq!(json["id"], user_id.as_str());
    assert_eq!(json["design_systems"][0]["color_tokens"].as_array().unwrap().len(), 10);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (ZENITH_TEST_DATABASE_URL)"]
async fn test_concurrent_first_logins_create_one_workspace() {
    let pool = test_pool().await;
    let user_id = unique_user_id();
    let user = identity(&user_id, "Ada", "Lovelace", "ada@example.com");

    let (left_repo, right_repo) = (ProfileRepository::new(&pool), ProfileRepository::new(&pool));
    let (left_service, right_service) = (ProfileService::new(&left_repo), ProfileService::new(&right_repo));
    let (left, right) = tokio::join!(
        left_service.provision(&user),
        right_service.provision(&user),
    );

    let created = [&left, &right]
        .into_iter()
        .filter(|r| matches!(r, Ok(InitialProfile::Created(_))))
        .count();
    assert_eq!(created, 1, "left: {left:?}, right: {right:?}");
    for result in [&left, &right] {
        assert!(
            matches!(
                result,
                Ok(InitialProfile::Created(_) | InitialProfile::Existing(_))
                    | Err(ProfileError::Repository(RepositoryError::Conflict(_)))
            ),
            "{result:?}"
        );
    }
    assert_eq!(owned_counts(&pool, &user_id).await, OwnedCounts::SEEDED);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL (ZENITH_TEST_DATABASE_URL)"]
async fn test_failed_seed_step_rolls_back_everything() {
    let pool = test_pool().await;
    let repo = ProfileRepository::new(&pool);
    let user_id = unique_user_id();
    let profile = NewProfile {
        id: user_id.clone(),
        name: "Ada Lovelace".to_owned(),
        image_url: String::new(),
        email: Email::parse("ada@example.com").unwrap(),
    };
    // The welcome file is written last; a negative size fails its CHECK.
    let seed = WorkspaceSeed {
        welcome_file: FileSeed {
            size: -1,
            ..ZENITH.welcome_file
        },
        ..ZENITH
    };

    let result = repo.create_profile_with_seed(&profile, &seed).await;

    assert!(matches!(result, Err(RepositoryError::Database(_))), "{result:?}");
    assert_eq!(owned_counts(&pool, &user_id).await, OwnedCounts::EMPTY);
    assert!(repo.find_profile(&user_id).await.unwrap().is_none());
}
