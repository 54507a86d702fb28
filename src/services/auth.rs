//! Primary login flow — credential check, session replacement, logout.
//!
//! Only admin principals may hold a session. A successful login always mints
//! a fresh session id; the previous id, if the browser presented one, is
//! cleared first so a pre-login id never carries admin state.

use serde::Serialize;
use sqlx::SqlitePool;

use super::identity::{self, IdentityError};
use super::session::{self, SessionData, SessionError, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account not permitted")]
    NotPermitted,
    #[error("identity store error: {0}")]
    Identity(#[from] IdentityError),
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
}

/// Session established by a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_id: String,
    pub session: SessionData,
}

/// Read-only view of the primary session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CurrentSession {
    pub authenticated: bool,
    pub username: Option<String>,
    pub is_admin: bool,
}

impl From<Option<&SessionData>> for CurrentSession {
    fn from(data: Option<&SessionData>) -> Self {
        data.map_or_else(Self::default, |d| Self {
            authenticated: d.is_authenticated(),
            username: d.username.clone(),
            is_admin: d.is_admin(),
        })
    }
}

/// Username is compared after trimming; the password is taken verbatim.
fn normalize_credentials<'a>(username: &'a str, password: &'a str) -> Result<(&'a str, &'a str), LoginError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(LoginError::MissingCredentials);
    }
    Ok((username, password))
}

/// Verify credentials and replace the session.
///
/// Failures leave any existing session untouched.
///
/// # Errors
///
/// `MissingCredentials`, `InvalidCredentials` or `NotPermitted` for client
/// errors; `Identity`/`Session` for backend failures.
pub async fn login(
    pool: &SqlitePool,
    store: &dyn SessionStore,
    previous_session_id: Option<&str>,
    username: &str,
    password: &str,
) -> Result<LoginOutcome, LoginError> {
    let (username, password) = normalize_credentials(username, password)?;

    let identity = identity::find_by_username(pool, username)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;
    if !identity::verify_password_blocking(identity.password_hash.clone(), password.to_owned()).await? {
        return Err(LoginError::InvalidCredentials);
    }

    if !identity.is_admin {
        return Err(LoginError::NotPermitted);
    }

    if let Some(previous) = previous_session_id {
        store.clear(previous).await?;
    }

    let session_id = session::generate_session_id();
    let data = SessionData::admin(identity.id, identity.username);
    store.set(&session_id, data.clone()).await?;

    Ok(LoginOutcome { session_id, session: data })
}

/// Drop the session behind `session_id`. Idempotent; no id is a no-op.
pub async fn logout(store: &dyn SessionStore, session_id: Option<&str>) -> Result<(), SessionError> {
    if let Some(id) = session_id {
        store.clear(id).await?;
    }
    Ok(())
}

/// Pure read of the session behind `session_id`.
pub async fn current_session(
    store: &dyn SessionStore,
    session_id: Option<&str>,
) -> Result<CurrentSession, SessionError> {
    let Some(id) = session_id else {
        return Ok(CurrentSession::default());
    };
    let data = store.get(id).await?;
    Ok(CurrentSession::from(data.as_ref()))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
