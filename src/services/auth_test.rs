use super::*;
use crate::db::test_helpers::memory_pool;
use crate::services::session::MemorySessionStore;

async fn seeded_pool() -> SqlitePool {
    let pool = memory_pool().await;
    identity::ensure_default_admin(&pool, "admin", "adminpw").await.unwrap();
    identity::insert_if_absent(&pool, "viewer", "viewerpw", false).await.unwrap();
    pool
}

// =============================================================================
// normalize_credentials
// =============================================================================

#[test]
fn normalize_credentials_trims_username_only() {
    let (u, p) = normalize_credentials("  admin \t", " pw ").unwrap();
    assert_eq!(u, "admin");
    assert_eq!(p, " pw ");
}

#[test]
fn normalize_credentials_rejects_blank_username() {
    assert!(matches!(normalize_credentials("   ", "pw"), Err(LoginError::MissingCredentials)));
    assert!(matches!(normalize_credentials("", "pw"), Err(LoginError::MissingCredentials)));
}

#[test]
fn normalize_credentials_rejects_empty_password() {
    assert!(matches!(normalize_credentials("admin", ""), Err(LoginError::MissingCredentials)));
}

// =============================================================================
// CurrentSession
// =============================================================================

#[test]
fn current_session_from_none_is_anonymous() {
    assert_eq!(CurrentSession::from(None::<&SessionData>), CurrentSession::default());
}

#[test]
fn current_session_from_admin_record() {
    let data = SessionData::admin(1, "admin");
    let current = CurrentSession::from(Some(&data));
    assert!(current.authenticated);
    assert!(current.is_admin);
    assert_eq!(current.username.as_deref(), Some("admin"));
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_creates_admin_session() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();

    let outcome = login(&pool, &store, None, "admin", "adminpw").await.unwrap();
    assert_eq!(outcome.session.username.as_deref(), Some("admin"));
    assert_eq!(outcome.session.is_admin, Some(true));
    assert_eq!(store.get(&outcome.session_id).await.unwrap(), Some(outcome.session));
}

#[tokio::test]
async fn login_accepts_padded_username() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    assert!(login(&pool, &store, None, "  admin  ", "adminpw").await.is_ok());
}

#[tokio::test]
async fn login_unknown_user_is_invalid_credentials() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    let err = login(&pool, &store, None, "nobody", "adminpw").await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn login_wrong_password_is_invalid_credentials() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    let err = login(&pool, &store, None, "admin", "wrong").await.unwrap_err();
    assert!(matches!(err, LoginError::InvalidCredentials));
}

#[tokio::test]
async fn login_non_admin_is_not_permitted() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    let err = login(&pool, &store, None, "viewer", "viewerpw").await.unwrap_err();
    assert!(matches!(err, LoginError::NotPermitted));
}

#[tokio::test]
async fn login_replaces_previous_session() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    store.set("old", SessionData { username: Some("stale".into()), ..SessionData::default() }).await.unwrap();

    let outcome = login(&pool, &store, Some("old"), "admin", "adminpw").await.unwrap();
    assert_ne!(outcome.session_id, "old");
    assert!(store.get("old").await.unwrap().is_none());
}

#[tokio::test]
async fn login_failure_keeps_previous_session() {
    let pool = seeded_pool().await;
    let store = MemorySessionStore::new();
    store.set("keep", SessionData::admin(1, "admin")).await.unwrap();

    assert!(login(&pool, &store, Some("keep"), "admin", "wrong").await.is_err());
    assert!(login(&pool, &store, Some("keep"), "viewer", "viewerpw").await.is_err());
    assert_eq!(store.get("keep").await.unwrap(), Some(SessionData::admin(1, "admin")));
}

// =============================================================================
// logout / current_session
// =============================================================================

#[tokio::test]
async fn logout_clears_session_and_is_idempotent() {
    let store = MemorySessionStore::new();
    store.set("s1", SessionData::admin(1, "admin")).await.unwrap();

    logout(&store, Some("s1")).await.unwrap();
    assert!(store.get("s1").await.unwrap().is_none());
    logout(&store, Some("s1")).await.unwrap();
    logout(&store, None).await.unwrap();
}

#[tokio::test]
async fn current_session_without_id_is_anonymous() {
    let store = MemorySessionStore::new();
    assert_eq!(current_session(&store, None).await.unwrap(), CurrentSession::default());
}

#[tokio::test]
async fn current_session_unknown_id_is_anonymous() {
    let store = MemorySessionStore::new();
    assert_eq!(current_session(&store, Some("nope")).await.unwrap(), CurrentSession::default());
}

#[tokio::test]
async fn current_session_reads_stored_record() {
    let store = MemorySessionStore::new();
    store.set("s2", SessionData::admin(4, "root")).await.unwrap();
    let current = current_session(&store, Some("s2")).await.unwrap();
    assert_eq!(current, CurrentSession { authenticated: true, username: Some("root".into()), is_admin: true });
}
