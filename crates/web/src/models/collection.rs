//! Collection and task domain types.

use chrono::{DateTime, Utc};

use taskdeck_core::{CollectionColor, CollectionId, CollectionName, TaskId, UserId};

/// A user-owned, named, colored grouping of tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: CollectionId,
    pub user_id: UserId,
    pub name: CollectionName,
    pub color: CollectionColor,
    pub created_at: DateTime<Utc>,
}

/// An item in a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub collection_id: CollectionId,
    pub content: String,
    pub done: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A collection together with all of its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionWithTasks {
    pub collection: Collection,
    pub tasks: Vec<Task>,
}

impl CollectionWithTasks {
    /// Number of tasks marked done.
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }
}
