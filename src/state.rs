//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the identity pool, the session store behind a trait object, and the
//! canonical content root used by every file-serving route.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::session::SessionStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sessions: Arc<dyn SessionStore>,
    /// Canonicalized directory that static content must stay inside.
    pub content_root: Arc<PathBuf>,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: SqlitePool, sessions: Arc<dyn SessionStore>, content_root: PathBuf, cookie_secure: bool) -> Self {
        Self { pool, sessions, content_root: Arc::new(content_root), cookie_secure }
    }

    #[must_use]
    pub fn content_root(&self) -> &Path {
        &self.content_root
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
