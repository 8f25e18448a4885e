//! `PostgreSQL` collection store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use taskdeck_core::{
    CollectionColor, CollectionId, CollectionName, NewCollection, TaskId, UserId,
};

use super::{CollectionStore, RepositoryError, conflict_on_unique};
use crate::models::{Collection, CollectionWithTasks, Task};

/// Collection store backed by the `taskdeck.collection` and `taskdeck.task`
/// tables.
#[derive(Clone)]
pub struct PgCollectionStore {
    pool: PgPool,
}

impl PgCollectionStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: i32,
    user_id: i32,
    name: String,
    color: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CollectionRow> for Collection {
    type Error = RepositoryError;

    fn try_from(row: CollectionRow) -> Result<Self, Self::Error> {
        let name = CollectionName::parse(&row.name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid name on collection {}: {e}", row.id))
        })?;
        let color = row.color.parse::<CollectionColor>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid color on collection {}: {e}", row.id))
        })?;

        Ok(Self {
            id: CollectionId::new(row.id),
            user_id: UserId::new(row.user_id),
            name,
            color,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: i32,
    collection_id: i32,
    content: String,
    done: bool,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: TaskId::new(row.id),
            collection_id: CollectionId::new(row.collection_id),
            content: row.content,
            done: row.done,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CollectionStore for PgCollectionStore {
    async fn find_collections(
        &self,
        owner: UserId,
    ) -> Result<Vec<CollectionWithTasks>, RepositoryError> {
        let rows = sqlx::query_as::<_, CollectionRow>(
            r"
            SELECT id, user_id, name, color, created_at
            FROM taskdeck.collection
            WHERE user_id = $1
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let task_rows = sqlx::query_as::<_, TaskRow>(
            r"
            SELECT id, collection_id, content, done, expires_at, created_at
            FROM taskdeck.task
            WHERE collection_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tasks_by_collection: HashMap<CollectionId, Vec<Task>> = HashMap::new();
        for row in task_rows {
            let task = Task::from(row);
            tasks_by_collection
                .entry(task.collection_id)
                .or_default()
                .push(task);
        }

        rows.into_iter()
            .map(|row| {
                let collection = Collection::try_from(row)?;
                let tasks = tasks_by_collection
                    .remove(&collection.id)
                    .unwrap_or_default();
                Ok(CollectionWithTasks { collection, tasks })
            })
            .collect()
    }

    async fn create_collection(
        &self,
        owner: UserId,
        collection: &NewCollection,
    ) -> Result<Collection, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r"
            INSERT INTO taskdeck.collection (user_id, name, color)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, color, created_at
            ",
        )
        .bind(owner)
        .bind(&collection.name)
        .bind(collection.color)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "collection name already in use"))?;

        Collection::try_from(row)
    }
}
