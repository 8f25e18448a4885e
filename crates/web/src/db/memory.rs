//! In-process store for tests and local runs without `PostgreSQL`.
//!
//! Mirrors the constraints of the SQL schema: unique emails, unique
//! collection names per owner, and oldest-first ordering.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use taskdeck_core::{CollectionId, Email, NewCollection, TaskId, UserId};

use super::{CollectionStore, RepositoryError, UserStore};
use crate::models::user::NewUser;
use crate::models::{Collection, CollectionWithTasks, Task, User};

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    collections: Vec<Collection>,
    tasks: Vec<Task>,
    next_id: i32,
}

impl Tables {
    const fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`CollectionStore`] and [`UserStore`].
///
/// Cloning shares the underlying tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    collection_writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent collection read fail as if the database had
    /// gone away.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent collection write fail as if the database had
    /// gone away.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// How many times `create_collection` has been called, including calls
    /// that failed.
    #[must_use]
    pub fn collection_write_attempts(&self) -> usize {
        self.collection_writes.load(Ordering::SeqCst)
    }

    /// Add a task to an existing collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the collection does not
    /// exist.
    pub async fn add_task(
        &self,
        collection_id: CollectionId,
        content: &str,
        done: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Task, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.collections.iter().any(|c| c.id == collection_id) {
            return Err(RepositoryError::DataCorruption(format!(
                "task references missing collection {collection_id}"
            )));
        }

        let task = Task {
            id: TaskId::new(tables.next_id()),
            collection_id,
            content: content.to_owned(),
            done,
            expires_at,
            created_at: Utc::now(),
        };
        tables.tasks.push(task.clone());
        drop(tables);
        Ok(task)
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn find_collections(
        &self,
        owner: UserId,
    ) -> Result<Vec<CollectionWithTasks>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }

        let tables = self.tables.read().await;
        let found: Vec<_> = tables
            .collections
            .iter()
            .filter(|c| c.user_id == owner)
            .map(|c| CollectionWithTasks {
                collection: c.clone(),
                tasks: tables
                    .tasks
                    .iter()
                    .filter(|t| t.collection_id == c.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        drop(tables);
        Ok(found)
    }

    async fn create_collection(
        &self,
        owner: UserId,
        collection: &NewCollection,
    ) -> Result<Collection, RepositoryError> {
        self.collection_writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut tables = self.tables.write().await;
        if tables
            .collections
            .iter()
            .any(|c| c.user_id == owner && c.name == collection.name)
        {
            return Err(RepositoryError::Conflict(
                "collection name already in use".to_owned(),
            ));
        }

        let created = Collection {
            id: CollectionId::new(tables.next_id()),
            user_id: owner,
            name: collection.name.clone(),
            color: collection.color,
            created_at: Utc::now(),
        };
        tables.collections.push(created.clone());
        drop(tables);
        Ok(created)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let created = User {
            id: UserId::new(tables.next_id()),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: Utc::now(),
        };
        tables
            .users
            .push((created.clone(), user.password_hash.clone()));
        drop(tables);
        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read().await;
        let found = tables.users.iter().find(|(u, _)| &u.email == email).cloned();
        drop(tables);
        Ok(found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use taskdeck_core::{CollectionColor, CollectionName};

    use super::*;

    fn new_collection(name: &str) -> NewCollection {
        NewCollection {
            name: CollectionName::parse(name).unwrap(),
            color: CollectionColor::Sunset,
        }
    }

    #[tokio::test]
    async fn test_collections_are_scoped_to_owner() {
        let store = MemoryStore::new();
        store
            .create_collection(UserId::new(100), &new_collection("Mine"))
            .await
            .unwrap();
        store
            .create_collection(UserId::new(200), &new_collection("Theirs"))
            .await
            .unwrap();

        let mine = store.find_collections(UserId::new(100)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].collection.name.as_str(), "Mine");
    }

    #[tokio::test]
    async fn test_insertion_order_is_kept() {
        let store = MemoryStore::new();
        let owner = UserId::new(1);
        for name in ["B", "A", "C"] {
            store
                .create_collection(owner, &new_collection(name))
                .await
                .unwrap();
        }

        let names: Vec<_> = store
            .find_collections(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.collection.name.to_string())
            .collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let store = MemoryStore::new();
        let owner = UserId::new(1);
        store
            .create_collection(owner, &new_collection("Work"))
            .await
            .unwrap();

        let err = store
            .create_collection(owner, &new_collection("Work"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.collection_write_attempts(), 2);
    }

    #[tokio::test]
    async fn test_tasks_are_nested() {
        let store = MemoryStore::new();
        let owner = UserId::new(1);
        let work = store
            .create_collection(owner, &new_collection("Work"))
            .await
            .unwrap();
        store.add_task(work.id, "Ship it", true, None).await.unwrap();
        store.add_task(work.id, "Test it", false, None).await.unwrap();

        let found = store.find_collections(owner).await.unwrap();
        assert_eq!(found[0].tasks.len(), 2);
        assert_eq!(found[0].done_count(), 1);
    }

    #[tokio::test]
    async fn test_task_requires_collection() {
        let store = MemoryStore::new();
        let err = store
            .add_task(CollectionId::new(404), "orphan", false, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let err = store
            .create_collection(UserId::new(1), &new_collection("Work"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));
        assert!(store.find_collections(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let store = MemoryStore::new();
        let owner = UserId::new(1);
        store
            .create_collection(owner, &new_collection("Work"))
            .await
            .unwrap();

        store.set_fail_reads(true);
        let err = store.find_collections(owner).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Database(_)));

        store.set_fail_reads(false);
        assert_eq!(store.find_collections(owner).await.unwrap().len(), 1);
    }
}
