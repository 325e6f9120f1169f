//! Sign-in through the hosted identity provider.
//!
//! The provider's OAuth authorization code flow establishes who the user is.
//! Only the provider's user id is kept in the session.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::{Rng, distr::Alphanumeric};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_identity, set_identity, take_oauth_state};
use crate::models::session_keys;
use crate::state::AppState;

const OAUTH_STATE_LENGTH: usize = 32;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

fn generate_oauth_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(OAUTH_STATE_LENGTH)
        .map(char::from)
        .collect()
}

/// Start sign-in.
///
/// # Route
///
/// `GET /auth/sign-in`
pub async fn sign_in(State(state): State<AppState>, session: Session) -> Result<Response> {
    let oauth_state = generate_oauth_state();
    session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await?;

    let url = state
        .identity()
        .sign_in_url(&state.config().oauth_callback_url(), &oauth_state)?;

    Ok(Redirect::to(&url).into_response())
}

/// Finish sign-in: check `state`, exchange the code, remember the user.
///
/// # Route
///
/// `GET /auth/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response> {
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!(%error, %description, "identity provider denied sign-in");
        return Err(AppError::BadRequest("sign-in was denied".to_owned()));
    }

    let stored_state = take_oauth_state(&session).await?;
    let (Some(code), Some(returned_state)) = (query.code, query.state) else {
        tracing::warn!("OAuth callback missing code or state");
        return Err(AppError::BadRequest("missing code or state".to_owned()));
    };

    if stored_state.as_deref() != Some(returned_state.as_str()) {
        tracing::warn!("OAuth state mismatch");
        return Err(AppError::BadRequest("invalid state".to_owned()));
    }

    let redirect_uri = state.config().oauth_callback_url();
    let token = state.identity().exchange_code(&code, &redirect_uri).await?;
    let user_id = state.identity().userinfo(&token.access_token).await?;

    set_sentry_user(&user_id, None);
    tracing::info!(%user_id, "user signed in");
    set_identity(&session, user_id).await?;

    Ok(Redirect::to("/setup").into_response())
}

/// Sign out.
///
/// # Route
///
/// `POST /auth/sign-out`
pub async fn sign_out(session: Session) -> Result<Response> {
    clear_identity(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::json;
    use tower::ServiceExt;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::routes::test_support::app;

    fn session_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    fn location(response: &axum::response::Response) -> String {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn test_sign_in_redirects_with_state() {
        let app = app("https://accounts.identity.test");

        let response = app
            .oneshot(Request::get("/auth/sign-in").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let url = Url::parse(&location(&response)).unwrap();
        assert_eq!(url.host_str(), Some("accounts.identity.test"));
        let state = url
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(state.len(), 32);
        assert!(session_cookie(&response).starts_with("zenith_session="));
    }

    #[tokio::test]
    async fn test_callback_rejects_unknown_state() {
        let app = app("https://accounts.identity.test");

        let response = app
            .oneshot(
                Request::get("/auth/callback?code=abc&state=forged")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_callback_reports_provider_denial() {
        let app = app("https://accounts.identity.test");

        let response = app
            .oneshot(
                Request::get("/auth/callback?error=access_denied")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unsigned_session_cookie_is_ignored() {
        let app = app("https://accounts.identity.test");

        let response = app
            .clone()
            .oneshot(Request::get("/auth/sign-in").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let state = Url::parse(&location(&response))
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        // A signed value is a 44-character digest followed by the session id.
        let signed = session_cookie(&response);
        let (name, value) = signed.split_once('=').unwrap();
        assert!(value.len() > 44);
        let cookie = format!("{name}={}", &value[44..]);

        // The bare session id does not verify, so the pending OAuth state
        // is out of reach.
        let response = app
            .oneshot(
                Request::get(format!("/auth/callback?code=abc&state={state}"))
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_sign_in_round_trip_stores_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": "at_1" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/oauth/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sub": "user_ada" })))
            .mount(&server)
            .await;
        // The user was deleted at the provider right after signing in.
        Mock::given(method("GET"))
            .and(path("/v1/users/user_ada"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let app = app(&server.uri());

        let response = app
            .clone()
            .oneshot(Request::get("/auth/sign-in").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = session_cookie(&response);
        let state = Url::parse(&location(&response))
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::get(format!("/auth/callback?code=abc&state={state}"))
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/setup");
        let cookie = session_cookie(&response);

        // The stored identity is looked up at the provider; a vanished user
        // is sent back to sign-in without touching the database.
        let response = app
            .clone()
            .oneshot(
                Request::get("/setup")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/auth/sign-in");

        let response = app
            .clone()
            .oneshot(
                Request::post("/auth/sign-out")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(
                Request::get("/api/profile")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
