//! Auth routes — password login, logout, identity probe.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::services::auth::{self as auth_svc, CurrentSession, LoginError};
use crate::services::claim::CLAIM_COOKIE_NAME;
use crate::services::gate;
use crate::state::AppState;

pub const COOKIE_NAME: &str = "session";

// =============================================================================
// REQUEST AUTH EXTRACTOR
// =============================================================================

/// Both credentials a request may carry. Extraction never fails: an unknown,
/// missing or unreadable session is simply anonymous.
pub struct RequestAuth {
    /// Opaque id from the session cookie, if one was presented.
    pub session_id: Option<String>,
    pub session: CurrentSession,
    /// Raw secondary claim cookie value.
    pub claim_token: Option<String>,
}

fn non_empty_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl<S> axum::extract::FromRequestParts<S> for RequestAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session_id = non_empty_cookie(&jar, COOKIE_NAME);
        let claim_token = non_empty_cookie(&jar, CLAIM_COOKIE_NAME);

        let app_state = AppState::from_ref(state);
        let session = match auth_svc::current_session(app_state.sessions.as_ref(), session_id.as_deref()).await {
            Ok(current) => current,
            Err(e) => {
                tracing::error!(error = %e, "session lookup failed; treating request as anonymous");
                CurrentSession::default()
            }
        };

        Ok(Self { session_id, session, claim_token })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "ok": false, "error": message }))).into_response()
}

/// Map a login failure onto the JSON error envelope.
pub(crate) fn login_error_response(err: &LoginError) -> Response {
    match err {
        LoginError::MissingCredentials => error_body(StatusCode::BAD_REQUEST, "Missing credentials."),
        LoginError::InvalidCredentials => error_body(StatusCode::UNAUTHORIZED, "Invalid username or password."),
        LoginError::NotPermitted => error_body(StatusCode::FORBIDDEN, "Account not permitted."),
        LoginError::Identity(_) | LoginError::Session(_) => {
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.")
        }
    }
}

/// Login body. Anything that is not an `application/json` object with string
/// fields is treated as an empty object.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginRequest {
    pub(crate) fn from_extracted(body: Result<Json<Self>, JsonRejection>) -> Self {
        match body {
            Ok(Json(request)) => request,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "login body rejected");
                Self::default()
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/login` — verify credentials, replace the session.
pub async fn login(
    State(state): State<AppState>,
    auth: RequestAuth,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let request = LoginRequest::from_extracted(body);
    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();

    let outcome = match auth_svc::login(
        &state.pool,
        state.sessions.as_ref(),
        auth.session_id.as_deref(),
        &username,
        &password,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            match &e {
                LoginError::Identity(_) | LoginError::Session(_) => tracing::error!(error = %e, "login failed"),
                _ => tracing::info!(username = %username.trim(), reason = %e, "login rejected"),
            }
            return login_error_response(&e);
        }
    };

    let username = outcome.session.username.clone().unwrap_or_default();
    tracing::info!(%username, "admin login");

    let jar = CookieJar::new().add(session_cookie(outcome.session_id, state.cookie_secure));
    (jar, Json(json!({ "ok": true, "username": username, "is_admin": true }))).into_response()
}

/// `POST /api/logout` — clear the session and expire the cookie. Always succeeds.
pub async fn logout(State(state): State<AppState>, auth: RequestAuth) -> impl IntoResponse {
    if let Err(e) = auth_svc::logout(state.sessions.as_ref(), auth.session_id.as_deref()).await {
        tracing::error!(error = %e, "session clear failed");
    }

    let jar = CookieJar::new().add(expired_session_cookie(state.cookie_secure));
    (jar, Json(json!({ "ok": true })))
}

/// `GET /api/me` — who the request is, by either credential.
pub async fn me(auth: RequestAuth) -> Json<gate::WhoAmI> {
    Json(gate::who_am_i(&auth.session, auth.claim_token.as_deref()))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
