//! Runtime configuration loaded from environment variables.
//!
//! Every setting has a default so the service starts with no environment at
//! all. Values that fail to parse fall back to the default rather than
//! aborting startup.

use std::path::PathBuf;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://app.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "veryrealpassword123";

/// Where session records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// `sessions` table in the identity database.
    Database,
    /// Process-local map; sessions die with the process.
    Memory,
}

impl SessionBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "database" | "db" | "sql" => Some(Self::Database),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub content_dir: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    pub cookie_secure: bool,
    pub session_backend: SessionBackend,
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let session_backend = match lookup("SESSION_STORE") {
            None => SessionBackend::Database,
            Some(raw) => SessionBackend::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "unknown SESSION_STORE, using database");
                SessionBackend::Database
            }),
        };

        Self {
            host: string("HOST", DEFAULT_HOST),
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PORT),
            database_url: string("DATABASE_URL", DEFAULT_DATABASE_URL),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            content_dir: PathBuf::from(string("CONTENT_DIR", DEFAULT_CONTENT_DIR)),
            admin_username: string("ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME),
            admin_password: string("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            cookie_secure: lookup("COOKIE_SECURE")
                .as_deref()
                .and_then(parse_bool)
                .unwrap_or(false),
            session_backend,
        }
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
