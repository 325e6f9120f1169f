//! Profile route handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::error::{AppError, Result, set_sentry_user};
use crate::identity::RequestIdentity;
use crate::middleware::{OptionalIdentity, RequireIdentity};
use crate::models::ProfileWorkspace;
use crate::services::profile::{InitialProfile, ProfileService};
use crate::state::AppState;

/// Landing page after sign-in. Provisions the profile on first visit.
///
/// Responds `201 Created` when the profile was just provisioned and
/// `200 OK` when it already existed.
///
/// # Route
///
/// `GET /setup`
pub async fn setup(
    State(state): State<AppState>,
    OptionalIdentity(user_id): OptionalIdentity,
) -> Result<Response> {
    let identity = RequestIdentity::new(user_id, state.identity());
    let profiles = state.profiles();

    let (status, profile) = match ProfileService::new(&profiles)
        .initial_profile(&identity)
        .await?
    {
        InitialProfile::SignInRequired => {
            return Ok(Redirect::to("/auth/sign-in").into_response());
        }
        InitialProfile::Created(profile) => (StatusCode::CREATED, profile),
        InitialProfile::Existing(profile) => (StatusCode::OK, profile),
    };

    set_sentry_user(&profile.id, Some(profile.email.as_str()));
    Ok((status, Json(profile)).into_response())
}

/// The signed-in user's profile with favorite folders and design systems.
///
/// # Route
///
/// `GET /api/profile`
pub async fn api_profile(
    State(state): State<AppState>,
    RequireIdentity(user_id): RequireIdentity,
) -> Result<Json<ProfileWorkspace>> {
    let identity = RequestIdentity::new(Some(user_id), state.identity());
    let profiles = state.profiles();

    ProfileService::new(&profiles)
        .current_profile(&identity)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("profile".to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::routes::test_support::app;

    #[tokio::test]
    async fn test_setup_without_session_redirects_to_sign_in() {
        let response = app("https://accounts.identity.test")
            .oneshot(Request::get("/setup").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/sign-in"
        );
    }

    #[tokio::test]
    async fn test_api_profile_without_session_is_unauthorized() {
        let response = app("https://accounts.identity.test")
            .oneshot(Request::get("/api/profile").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
