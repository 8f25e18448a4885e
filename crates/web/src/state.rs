//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::TaskdeckConfig;
use crate::db::{CollectionStore, MemoryStore, PgCollectionStore, PgUserStore, UserStore};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: TaskdeckConfig,
    pool: Option<PgPool>,
    collections: Arc<dyn CollectionStore>,
    users: Arc<dyn UserStore>,
}

impl AppState {
    /// State backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(config: TaskdeckConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                collections: Arc::new(PgCollectionStore::new(pool.clone())),
                users: Arc::new(PgUserStore::new(pool.clone())),
                pool: Some(pool),
            }),
        }
    }

    /// State backed by an in-process [`MemoryStore`].
    #[must_use]
    pub fn in_memory(config: TaskdeckConfig, store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool: None,
                collections: Arc::new(store.clone()),
                users: Arc::new(store),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &TaskdeckConfig {
        &self.inner.config
    }

    /// The database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn collections(&self) -> &dyn CollectionStore {
        self.inner.collections.as_ref()
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }
}
