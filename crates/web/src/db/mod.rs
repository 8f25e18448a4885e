//! Persistence for Taskdeck.
//!
//! # Tables (`taskdeck` schema)
//!
//! - `user` - Registered users
//! - `user_password` - Argon2id password hashes
//! - `collection` - Collections, one owner each
//! - `task` - Tasks, one collection each
//! - `tower_sessions.session` - Session storage (created by the session store)
//!
//! The handlers talk to the [`CollectionStore`] and [`UserStore`] traits.
//! [`PgCollectionStore`] and [`PgUserStore`] back them with `PostgreSQL`;
//! [`MemoryStore`] backs both in-process for tests and local runs.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p taskdeck-cli -- migrate
//! ```

pub mod collections;
pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use taskdeck_core::{Email, NewCollection, UserId};

use crate::models::user::NewUser;
use crate::models::{Collection, CollectionWithTasks, User};

pub use collections::PgCollectionStore;
pub use memory::MemoryStore;
pub use users::PgUserStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Collection persistence.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// All collections owned by `owner`, each with its tasks.
    ///
    /// Collections come back oldest first; tasks within a collection too.
    async fn find_collections(
        &self,
        owner: UserId,
    ) -> Result<Vec<CollectionWithTasks>, RepositoryError>;

    /// Persist a new collection for `owner`.
    ///
    /// Returns `RepositoryError::Conflict` if `owner` already has a
    /// collection with the same name.
    async fn create_collection(
        &self,
        owner: UserId,
        collection: &NewCollection,
    ) -> Result<Collection, RepositoryError>;
}

/// User persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// A user and their password hash, if the email is registered.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError>;
}

/// Map a unique violation to `RepositoryError::Conflict`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(what.to_owned());
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
