use std::sync::Arc;

use gatehouse::config::{AppConfig, SessionBackend};
use gatehouse::services::identity;
use gatehouse::services::session::{MemorySessionStore, SessionStore, SqlSessionStore};
use gatehouse::{db, routes, state};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();

    let content_root = config
        .content_dir
        .canonicalize()
        .expect("CONTENT_DIR must exist");

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    match identity::ensure_default_admin(&pool, &config.admin_username, &config.admin_password).await {
        Ok(true) => tracing::info!(username = %config.admin_username, "default admin created"),
        Ok(false) => tracing::info!(username = %config.admin_username, "default admin already present"),
        Err(e) => panic!("admin bootstrap failed: {e}"),
    }

    let sessions: Arc<dyn SessionStore> = match config.session_backend {
        SessionBackend::Database => Arc::new(SqlSessionStore::new(pool.clone())),
        SessionBackend::Memory => Arc::new(MemorySessionStore::new()),
    };

    let state = state::AppState::new(pool, sessions, content_root, config.cookie_secure);
    let app = routes::app(state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, content_root = %state.content_root().display(), session_store = ?config.session_backend, "gatehouse listening");
    axum::serve(listener, app).await.expect("server failed");
}
