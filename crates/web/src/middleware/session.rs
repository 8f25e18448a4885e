//! Session middleware configuration.

use sqlx::PgPool;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::TaskdeckConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "taskdeck_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the `PostgreSQL` store.
///
/// The `tower_sessions.session` table is created by `taskdeck migrate`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &TaskdeckConfig,
) -> SessionManagerLayer<PostgresStore> {
    configure(PostgresStore::new(pool.clone()), config.is_secure())
}

/// Create a session layer that keeps sessions in process memory.
#[must_use]
pub fn create_memory_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    configure(MemoryStore::default(), secure)
}

fn configure<S: SessionStore + Clone>(store: S, secure: bool) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
