//! Secondary claim evaluation.
//!
//! THREAT MODEL
//! ============
//! The marker is a shared static string, not a signature. Anyone who knows
//! `INTEGRITY_MARKER` can mint a cookie for any username; there is no expiry,
//! no binding to a stored identity and no revocation. The marker constant is
//! the entire trust anchor for this path.

use super::token::{self, ClaimTriple};

/// Name of the cookie carrying the secondary claim.
pub const CLAIM_COOKIE_NAME: &str = "tg_session";

/// Fixed marker a claim must carry to be honored. Case-sensitive.
pub const INTEGRITY_MARKER: &str = "umbc1966";

/// Role (compared lower-cased) that grants admin access.
pub const ADMIN_ROLE: &str = "admin";

/// Username attributed when an admin claim carries an empty username.
pub const DEFAULT_CLAIM_USERNAME: &str = "admin";

/// Outcome of evaluating a secondary claim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdminClaim {
    pub is_admin: bool,
    /// Attributed identity. Only present when `is_admin` is true.
    pub username: Option<String>,
}

impl AdminClaim {
    #[must_use]
    pub fn denied() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn granted(username: impl Into<String>) -> Self {
        Self { is_admin: true, username: Some(username.into()) }
    }
}

/// Decide whether a decoded triple asserts admin privilege.
#[must_use]
pub fn evaluate(triple: &ClaimTriple) -> AdminClaim {
    if triple.marker != INTEGRITY_MARKER {
        return AdminClaim::denied();
    }
    if triple.role.to_lowercase() != ADMIN_ROLE {
        return AdminClaim::denied();
    }

    if triple.username.is_empty() {
        AdminClaim::granted(DEFAULT_CLAIM_USERNAME)
    } else {
        AdminClaim::granted(triple.username.as_str())
    }
}

/// Decode and evaluate a raw claim cookie. Absent, malformed and non-admin
/// cookies all yield `AdminClaim::denied()`.
#[must_use]
pub fn cookie_admin_claim(cookie_value: Option<&str>) -> AdminClaim {
    cookie_value
        .and_then(token::decode)
        .map(|triple| evaluate(&triple))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "claim_test.rs"]
mod tests;
