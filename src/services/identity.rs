//! Identity records — lookup, password hashing, default-admin bootstrap.
//!
//! Passwords are stored as Argon2 PHC strings and only ever compared through
//! `verify_password`. Registration is not exposed; the only writer is the
//! startup bootstrap.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use sqlx::{Row, SqlitePool};

/// Stored principal.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a password with a fresh random salt.
///
/// # Errors
///
/// Returns `IdentityError::Hash` if the salt or hash cannot be produced.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| IdentityError::Hash(e.to_string()))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Unparseable hashes never verify.
#[must_use]
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// `verify_password` on the blocking pool; Argon2 is too slow for the executor.
///
/// # Errors
///
/// Returns `IdentityError::Task` if the blocking task panicked or was cancelled.
pub async fn verify_password_blocking(password_hash: String, password: String) -> Result<bool, IdentityError> {
    let verified = tokio::task::spawn_blocking(move || verify_password(&password_hash, &password)).await?;
    Ok(verified)
}

/// Look up an identity by exact username.
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<Identity>, IdentityError> {
    let row = sqlx::query("SELECT id, username, password_hash, is_admin FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| Identity {
        id: r.get("id"),
        username: r.get("username"),
        password_hash: r.get("password_hash"),
        is_admin: r.get("is_admin"),
    }))
}

/// Insert an identity unless the username is taken. Returns `true` if a row was created.
pub async fn insert_if_absent(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<bool, IdentityError> {
    let owned = password.to_owned();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&owned)).await??;
    let result = sqlx::query(
        r"INSERT INTO users (username, password_hash, is_admin)
          VALUES (?, ?, ?)
          ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(password_hash)
    .bind(is_admin)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Make sure the default administrative principal exists. An existing record
/// with the same username is left untouched, password included.
pub async fn ensure_default_admin(pool: &SqlitePool, username: &str, password: &str) -> Result<bool, IdentityError> {
    if find_by_username(pool, username).await?.is_some() {
        return Ok(false);
    }
    insert_if_absent(pool, username, password, true).await
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
