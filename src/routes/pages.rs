//! Page routes — named pages, the gated admin page, and confined static files.
//!
//! Every file read goes through the canonical content root held in
//! `AppState`. The catch-all route resolves the requested path (following
//! symlinks and `..`) and refuses anything that does not land on a regular
//! file strictly inside that root; refusals redirect to `/index` without
//! touching the file.

use std::path::{Path as FsPath, PathBuf};

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, Request, State};
use axum::response::{IntoResponse, Redirect, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::auth::RequestAuth;
use crate::services::gate;
use crate::state::AppState;

pub const INDEX_PATH: &str = "/index";
pub const LOGIN_PATH: &str = "/login";

const INDEX_FILE: &str = "index.html";
const LOGIN_FILE: &str = "login.html";
const DOCS_FILE: &str = "docs.html";
const ADMIN_FILE: &str = "admin.html";

/// Resolve `requested` under `root`, returning the canonical path only if it
/// is a regular file strictly inside `root`. `root` must already be canonical.
pub async fn resolve_confined(root: &FsPath, requested: &str) -> Option<PathBuf> {
    let resolved = tokio::fs::canonicalize(root.join(requested)).await.ok()?;
    if resolved == root || !resolved.starts_with(root) {
        tracing::warn!(requested, "static path escapes content root");
        return None;
    }

    let metadata = tokio::fs::metadata(&resolved).await.ok()?;
    metadata.is_file().then_some(resolved)
}

async fn serve_file(path: &FsPath, req: Request) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.into_response(),
        Err(never) => match never {},
    }
}

async fn serve_named(state: &AppState, file: &str, req: Request) -> Response {
    serve_file(&state.content_root().join(file), req).await
}

/// `GET /` — always the index page.
pub async fn root() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}

/// `GET /index`
pub async fn index(State(state): State<AppState>, req: Request) -> Response {
    serve_named(&state, INDEX_FILE, req).await
}

/// `GET /login`
pub async fn login(State(state): State<AppState>, req: Request) -> Response {
    serve_named(&state, LOGIN_FILE, req).await
}

/// `GET /docs`
pub async fn docs(State(state): State<AppState>, req: Request) -> Response {
    serve_named(&state, DOCS_FILE, req).await
}

/// `GET /admin` — served only when the gate allows; otherwise off to `/login`.
pub async fn admin(State(state): State<AppState>, auth: RequestAuth, req: Request) -> Response {
    let decision = gate::decide(&auth.session, auth.claim_token.as_deref());
    if !decision.allowed {
        return Redirect::temporary(LOGIN_PATH).into_response();
    }

    tracing::info!(username = ?decision.username, "admin page served");
    serve_named(&state, ADMIN_FILE, req).await
}

/// `GET /{*path}` — any other file under the content root.
pub async fn static_file(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    req: Request,
) -> Response {
    let Ok(Path(requested)) = path else {
        return Redirect::temporary(INDEX_PATH).into_response();
    };

    match resolve_confined(state.content_root(), &requested).await {
        Some(resolved) => serve_file(&resolved, req).await,
        None => Redirect::temporary(INDEX_PATH).into_response(),
    }
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
