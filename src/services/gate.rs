//! Authorization gate — reconciles the primary session and the secondary
//! claim cookie into one admin decision.
//!
//! The two sources are alternatives, not layers: either one asserting admin
//! is sufficient. The session is consulted first and short-circuits; the
//! claim cookie is only decoded when the session does not grant access.

use serde::Serialize;

use super::auth::CurrentSession;
use super::claim::{self, AdminClaim};

/// Per-request outcome. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub allowed: bool,
    /// Who the decision is attributed to, when known.
    pub username: Option<String>,
}

/// Body of the `/api/me` identity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmI {
    pub authenticated: bool,
    pub username: Option<String>,
    pub is_admin: bool,
}

/// Decide admin access from the session and the raw claim cookie.
#[must_use]
pub fn decide(session: &CurrentSession, claim_cookie: Option<&str>) -> AuthorizationDecision {
    if session.is_admin {
        return AuthorizationDecision { allowed: true, username: session.username.clone() };
    }

    let AdminClaim { is_admin, username } = claim::cookie_admin_claim(claim_cookie);
    AuthorizationDecision { allowed: is_admin, username }
}

/// Yes/no form of `decide`, for callers that do not need the username.
#[must_use]
pub fn is_authorized_admin(session: &CurrentSession, claim_cookie: Option<&str>) -> bool {
    decide(session, claim_cookie).allowed
}

/// Combine both sources for the identity probe. The session username wins
/// over the claim username when both are present.
#[must_use]
pub fn who_am_i(session: &CurrentSession, claim_cookie: Option<&str>) -> WhoAmI {
    let claim = claim::cookie_admin_claim(claim_cookie);
    WhoAmI {
        authenticated: session.authenticated || claim.is_admin,
        username: session.username.clone().or(claim.username),
        is_admin: session.is_admin || claim.is_admin,
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
