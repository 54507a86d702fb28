//! Server-side session storage.
//!
//! ARCHITECTURE
//! ============
//! The browser holds only an opaque random id in the `session` cookie. The
//! record behind it (`user_id`, `username`, `is_admin`) lives in a
//! `SessionStore`, injected through `AppState` so handlers and tests never
//! touch ambient globals. Two backends exist: a process-local map and the
//! `sessions` table.
//!
//! TRADE-OFFS
//! ==========
//! Sessions carry no expiry. Concurrent writes to the same id resolve
//! last-writer-wins; no locking beyond the backend's own is attempted.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex session id.
#[must_use]
pub fn generate_session_id() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Fields stored behind a session id. All optional; an empty record is
/// indistinguishable from no session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub is_admin: Option<bool>,
}

impl SessionData {
    /// Record written after a successful admin login.
    #[must_use]
    pub fn admin(user_id: i64, username: impl Into<String>) -> Self {
        Self { user_id: Some(user_id), username: Some(username.into()), is_admin: Some(true) }
    }

    /// True when a non-zero `user_id` is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some_and(|id| id != 0)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Keyed get/set/clear over session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<SessionData>, SessionError>;

    /// Replace whatever is stored under `id`.
    async fn set(&self, id: &str, data: SessionData) -> Result<(), SessionError>;

    /// Remove the record. Clearing a missing id is not an error.
    async fn clear(&self, id: &str) -> Result<(), SessionError>;
}

// =============================================================================
// MEMORY BACKEND
// =============================================================================

/// Process-local store. Sessions are lost on restart.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn set(&self, id: &str, data: SessionData) -> Result<(), SessionError> {
        self.sessions.write().await.insert(id.to_owned(), data);
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

// =============================================================================
// DATABASE BACKEND
// =============================================================================

/// Store backed by the `sessions` table.
#[derive(Clone)]
pub struct SqlSessionStore {
    pool: SqlitePool,
}

impl SqlSessionStore {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SqlSessionStore {
    async fn get(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let row = sqlx::query("SELECT user_id, username, is_admin FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| SessionData {
            user_id: r.get("user_id"),
            username: r.get("username"),
            is_admin: r.get("is_admin"),
        }))
    }

    async fn set(&self, id: &str, data: SessionData) -> Result<(), SessionError> {
        sqlx::query(
            r"INSERT INTO sessions (id, user_id, username, is_admin)
              VALUES (?, ?, ?, ?)
              ON CONFLICT (id) DO UPDATE SET
                  user_id = excluded.user_id,
                  username = excluded.username,
                  is_admin = excluded.is_admin",
        )
        .bind(id)
        .bind(data.user_id)
        .bind(data.username)
        .bind(data.is_admin)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), SessionError> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
