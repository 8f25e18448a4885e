//! Collection listing and creation.
//!
//! Both flows take the identity as an explicit argument; neither reaches
//! into the session on its own.

use tracing::instrument;

use taskdeck_core::{
    CollectionColor, CollectionDraft, CollectionId, CreationPanel, Effect, SubmitError,
    TransitionError,
};

use crate::db::CollectionStore;
use crate::models::{Collection, CollectionWithTasks, CurrentUser};

/// One row of the collection listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
    pub color: CollectionColor,
    pub task_count: usize,
    pub done_count: usize,
}

impl From<&CollectionWithTasks> for CollectionSummary {
    fn from(item: &CollectionWithTasks) -> Self {
        Self {
            id: item.collection.id,
            name: item.collection.name.to_string(),
            color: item.collection.color,
            task_count: item.tasks.len(),
            done_count: item.done_count(),
        }
    }
}

impl CollectionSummary {
    /// Stable DOM key for the row.
    #[must_use]
    pub fn key(&self) -> String {
        format!("collection-{}", self.id)
    }

    /// Completed share of tasks, 0-100. An empty collection is 0.
    #[must_use]
    pub fn progress_percent(&self) -> usize {
        (self.done_count * 100)
            .checked_div(self.task_count)
            .unwrap_or(0)
    }
}

/// What the listing should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingView {
    /// Nobody is signed in.
    Unauthenticated,
    /// The store could not be read.
    Unavailable,
    /// Signed in, no collections yet.
    Empty,
    /// Signed in with one or more collections, in store order.
    Collections(Vec<CollectionSummary>),
}

impl ListingView {
    /// Whether the generic error state should be rendered.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::Unavailable)
    }

    /// Whether the empty-state prompt should be rendered.
    #[must_use]
    pub const fn is_empty_state(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Listing rows; empty for every state but `Collections`.
    #[must_use]
    pub fn rows(&self) -> &[CollectionSummary] {
        match self {
            Self::Collections(rows) => rows,
            _ => &[],
        }
    }
}

/// Decide what the collection listing shows for `identity`.
///
/// Never fails: a missing identity or a store error becomes an error view,
/// and the store error is logged.
#[instrument(skip(store, identity), fields(user_id))]
pub async fn load_listing(
    store: &dyn CollectionStore,
    identity: Option<&CurrentUser>,
) -> ListingView {
    let Some(user) = identity else {
        return ListingView::Unauthenticated;
    };
    tracing::Span::current().record("user_id", user.id.as_i32());

    match store.find_collections(user.id).await {
        Ok(collections) if collections.is_empty() => ListingView::Empty,
        Ok(collections) => {
            ListingView::Collections(collections.iter().map(CollectionSummary::from).collect())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to load collections");
            ListingView::Unavailable
        }
    }
}

/// Result of driving the creation panel through one form post.
#[derive(Debug)]
pub struct CreationOutcome {
    /// Panel state to render: open (invalid input or failed write) or closed.
    pub panel: CreationPanel,
    /// Side effects the caller must apply.
    pub effects: Vec<Effect>,
    /// The collection that was stored, on success.
    pub created: Option<Collection>,
}

impl CreationOutcome {
    /// The draft was rejected before reaching the store.
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.created.is_none() && self.effects.is_empty()
    }
}

/// Validate `draft` and, if it passes, store it as a new collection owned
/// by `owner`.
///
/// # Errors
///
/// Returns `TransitionError` only if the panel state machine is driven out
/// of order, which indicates a bug rather than bad input.
#[instrument(skip(store, owner, draft), fields(user_id = owner.id.as_i32()))]
pub async fn create_collection(
    store: &dyn CollectionStore,
    owner: &CurrentUser,
    draft: CollectionDraft,
) -> Result<CreationOutcome, TransitionError> {
    let mut panel = CreationPanel::open_with(draft);

    let payload = match panel.submit() {
        Ok(payload) => payload,
        Err(SubmitError::Invalid(errors)) => {
            tracing::debug!(?errors, "Collection form rejected");
            return Ok(CreationOutcome {
                panel,
                effects: Vec::new(),
                created: None,
            });
        }
        Err(SubmitError::Transition(e)) => return Err(e),
    };

    let result = store.create_collection(owner.id, &payload).await;
    let effects = panel.complete(result.as_ref().map(|_| ()))?;

    Ok(CreationOutcome {
        panel,
        effects,
        created: result.ok(),
    })
}
