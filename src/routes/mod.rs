//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One explicit table: the JSON auth API under `/api`, the named pages, and
//! a catch-all for other files under the content root. Static routes win
//! over the catch-all, so `/api/*` and the named pages never hit the file
//! resolver.

pub mod auth;
pub mod pages;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::root))
        .route("/index", get(pages::index))
        .route("/login", get(pages::login))
        .route("/docs", get(pages::docs))
        .route("/admin", get(pages::admin))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/{*path}", get(pages::static_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
