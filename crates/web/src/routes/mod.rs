//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page (welcome + collection listing)
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (database ping)
//!
//! # Collections (HTMX fragments)
//! GET  /collections/list           - Listing fragment (re-fetched on collections-changed)
//! GET  /collections/new            - Open the creation panel
//! GET  /collections/new/cancel     - Close the creation panel
//! GET  /collections/new/confirm    - Confirm button preview for ?color=
//! POST /collections                - Create a collection
//!
//! # Auth
//! GET  /auth/login                 - Login page
//! POST /auth/login                 - Login action
//! GET  /auth/register              - Register page
//! POST /auth/register              - Register action
//! POST /auth/logout                - Logout action
//! ```

pub mod auth;
pub mod collections;
pub mod health;
pub mod home;

use axum::{
    Router,
    extract::Request,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(collections::create))
        .route("/list", get(collections::list))
        .route("/new", get(collections::new_panel))
        .route("/new/cancel", get(collections::cancel_panel))
        .route("/new/confirm", get(collections::confirm_button))
}

/// Create all page and fragment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/collections", collection_routes())
        .nest("/auth", auth_routes())
}

/// Build the complete application.
///
/// The session layer is passed in so the same router runs against the
/// `PostgreSQL` session store in production and the memory store in tests.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(sessions)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
