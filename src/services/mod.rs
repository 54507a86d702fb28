//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own token parsing, identity lookup, session storage and
//! the admin decision so route handlers stay focused on protocol translation
//! and cookie plumbing.

pub mod auth;
pub mod claim;
pub mod gate;
pub mod identity;
pub mod session;
pub mod token;
