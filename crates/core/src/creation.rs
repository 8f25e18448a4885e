//! Collection creation workflow.
//!
//! The creation panel is a small state machine:
//!
//! ```text
//!            open                    submit (valid)
//!  Closed ─────────▶ Open ─────────────────────────▶ Submitting
//!    ▲                │ ▲                                  │
//!    │     cancel     │ │       complete(Err)              │
//!    └────────────────┘ └──────────────────────────────────┤
//!    ▲                                                     │
//!    └──────────────────── complete(Ok) ───────────────────┘
//! ```
//!
//! Transitions return the [`Effect`]s the caller must carry out (reset the
//! form, refresh the listing, show a notification, log a failure). The
//! machine itself performs no I/O.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CollectionColor, CollectionName, CollectionNameError};

/// Validated payload for creating a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: CollectionName,
    pub color: CollectionColor,
}

/// Unvalidated form input, exactly as entered.
///
/// `color` is empty until the user picks one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// Per-field validation messages for a [`CollectionDraft`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftErrors {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl DraftErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

impl CollectionDraft {
    /// Create a draft from raw input.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    /// The selected color, if it is a palette member.
    ///
    /// Drives the confirm button's live preview.
    #[must_use]
    pub fn selected_color(&self) -> Option<CollectionColor> {
        self.color.parse().ok()
    }

    /// Check the draft against the creation schema.
    ///
    /// # Errors
    ///
    /// Returns every failing field at once so the form can mark them all.
    pub fn validate(&self) -> Result<NewCollection, DraftErrors> {
        let name = CollectionName::parse(&self.name);
        let color = if self.color.is_empty() {
            Err("Select a color".to_owned())
        } else {
            self.color
                .parse::<CollectionColor>()
                .map_err(|_| "Choose one of the listed colors".to_owned())
        };

        match (name, color) {
            (Ok(name), Ok(color)) => Ok(NewCollection { name, color }),
            (name, color) => Err(DraftErrors {
                name: name.err().map(|e| name_message(&e)),
                color: color.err(),
            }),
        }
    }
}

fn name_message(err: &CollectionNameError) -> String {
    match err {
        CollectionNameError::Empty => "Name is required".to_owned(),
        CollectionNameError::TooLong { max } => {
            format!("Name must be at most {max} characters")
        }
    }
}

/// Visual treatment of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A transient, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    /// Shown after a collection was created.
    #[must_use]
    pub fn collection_created() -> Self {
        Self {
            title: "Success".to_owned(),
            description: "Collection created successfully".to_owned(),
            variant: NotificationVariant::Default,
        }
    }

    /// Shown when the create call failed. Deliberately generic.
    #[must_use]
    pub fn collection_create_failed() -> Self {
        Self {
            title: "Error".to_owned(),
            description: "Something went Wrong, Please try again".to_owned(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Side effect requested by a panel transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Clear the form fields.
    ResetForm,
    /// Re-run the collection listing.
    RefreshListing,
    /// Show a notification.
    Notify(Notification),
    /// Record the underlying failure for diagnostics only.
    LogFailure(String),
}

/// Where the creation panel is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Closed,
    Open {
        draft: CollectionDraft,
        errors: DraftErrors,
    },
    Submitting {
        draft: CollectionDraft,
    },
}

impl PanelState {
    const fn label(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open { .. } => "open",
            Self::Submitting { .. } => "submitting",
        }
    }
}

/// A transition was requested from a state that does not allow it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {action} while the panel is {state}")]
pub struct TransitionError {
    pub action: &'static str,
    pub state: &'static str,
}

/// Why [`CreationPanel::submit`] did not start a submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The draft failed validation; the panel stays open.
    #[error("collection form is invalid")]
    Invalid(DraftErrors),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The collection creation panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationPanel {
    state: PanelState,
}

impl CreationPanel {
    /// A closed panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A panel that is already open with the given input.
    ///
    /// Used when a form post arrives: the panel was open on the client.
    #[must_use]
    pub fn open_with(draft: CollectionDraft) -> Self {
        Self {
            state: PanelState::Open {
                draft,
                errors: DraftErrors::default(),
            },
        }
    }

    #[must_use]
    pub const fn state(&self) -> &PanelState {
        &self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, PanelState::Open { .. })
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, PanelState::Submitting { .. })
    }

    /// The current input, if the panel is showing a form.
    #[must_use]
    pub const fn draft(&self) -> Option<&CollectionDraft> {
        match &self.state {
            PanelState::Closed => None,
            PanelState::Open { draft, .. } | PanelState::Submitting { draft } => Some(draft),
        }
    }

    /// Validation messages from the last rejected submit.
    #[must_use]
    pub fn errors(&self) -> DraftErrors {
        match &self.state {
            PanelState::Open { errors, .. } => errors.clone(),
            _ => DraftErrors::default(),
        }
    }

    const fn reject(&self, action: &'static str) -> TransitionError {
        TransitionError {
            action,
            state: self.state.label(),
        }
    }

    /// Show the panel with an empty form. Opening an open panel is a no-op.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight.
    pub fn open(&mut self) -> Result<(), TransitionError> {
        match self.state {
            PanelState::Closed => {
                self.state = PanelState::Open {
                    draft: CollectionDraft::default(),
                    errors: DraftErrors::default(),
                };
                Ok(())
            }
            PanelState::Open { .. } => Ok(()),
            PanelState::Submitting { .. } => Err(self.reject("open")),
        }
    }

    /// Replace the form input.
    ///
    /// # Errors
    ///
    /// Fails unless the panel is open.
    pub fn edit(&mut self, input: CollectionDraft) -> Result<(), TransitionError> {
        match &mut self.state {
            PanelState::Open { draft, .. } => {
                *draft = input;
                Ok(())
            }
            _ => Err(self.reject("edit")),
        }
    }

    /// Validate the form and, if it passes, begin submitting.
    ///
    /// Returns the payload to send to the store.
    ///
    /// # Errors
    ///
    /// [`SubmitError::Invalid`] leaves the panel open with the draft intact
    /// and the messages recorded; no side effects are requested.
    /// [`SubmitError::Transition`] is returned unless the panel is open, which
    /// also rules out a second submission while one is in flight.
    pub fn submit(&mut self) -> Result<NewCollection, SubmitError> {
        let PanelState::Open { draft, errors } = &mut self.state else {
            return Err(self.reject("submit").into());
        };

        match draft.validate() {
            Ok(payload) => {
                let draft = std::mem::take(draft);
                self.state = PanelState::Submitting { draft };
                Ok(payload)
            }
            Err(found) => {
                errors.clone_from(&found);
                Err(SubmitError::Invalid(found))
            }
        }
    }

    /// Record the outcome of the create call.
    ///
    /// Success closes and resets the panel, refreshes the listing and
    /// notifies. Failure reopens the panel with the same input, notifies
    /// with a generic message, and hands the cause to the logger.
    ///
    /// # Errors
    ///
    /// Fails unless a submission is in flight.
    pub fn complete<E: fmt::Display>(
        &mut self,
        outcome: Result<(), E>,
    ) -> Result<Vec<Effect>, TransitionError> {
        let PanelState::Submitting { draft } = &mut self.state else {
            return Err(self.reject("complete"));
        };

        match outcome {
            Ok(()) => {
                self.state = PanelState::Closed;
                Ok(vec![
                    Effect::ResetForm,
                    Effect::RefreshListing,
                    Effect::Notify(Notification::collection_created()),
                ])
            }
            Err(cause) => {
                let draft = std::mem::take(draft);
                self.state = PanelState::Open {
                    draft,
                    errors: DraftErrors::default(),
                };
                Ok(vec![
                    Effect::Notify(Notification::collection_create_failed()),
                    Effect::LogFailure(cause.to_string()),
                ])
            }
        }
    }

    /// Dismiss the panel, discarding any input. Closing a closed panel is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight.
    pub fn cancel(&mut self) -> Result<Vec<Effect>, TransitionError> {
        match self.state {
            PanelState::Closed => Ok(Vec::new()),
            PanelState::Open { .. } => {
                self.state = PanelState::Closed;
                Ok(vec![Effect::ResetForm])
            }
            PanelState::Submitting { .. } => Err(self.reject("cancel")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groceries() -> CollectionDraft {
        CollectionDraft::new("Groceries", "Sunset")
    }

    #[test]
    fn test_starts_closed() {
        let panel = CreationPanel::new();
        assert_eq!(panel.state(), &PanelState::Closed);
        assert!(panel.draft().is_none());
    }

    #[test]
    fn test_open_shows_empty_form() {
        let mut panel = CreationPanel::new();
        panel.open().unwrap();
        assert!(panel.is_open());
        assert_eq!(panel.draft(), Some(&CollectionDraft::default()));
    }

    #[test]
    fn test_valid_submit_moves_to_submitting() {
        let mut panel = CreationPanel::open_with(groceries());
        let payload = panel.submit().unwrap();

        assert_eq!(payload.name.as_str(), "Groceries");
        assert_eq!(payload.color, CollectionColor::Sunset);
        assert!(panel.is_submitting());
        assert_eq!(panel.draft(), Some(&groceries()));
    }

    #[test]
    fn test_empty_name_is_rejected_and_panel_stays_open() {
        let mut panel = CreationPanel::open_with(CollectionDraft::new("", "Sunset"));

        let Err(SubmitError::Invalid(errors)) = panel.submit() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert!(errors.color.is_none());
        assert!(panel.is_open());
        assert_eq!(panel.errors(), errors);
        assert_eq!(panel.draft().unwrap().color, "Sunset");
    }

    #[test]
    fn test_unknown_color_is_rejected() {
        let mut panel = CreationPanel::open_with(CollectionDraft::new("Work", "Teal"));

        let Err(SubmitError::Invalid(errors)) = panel.submit() else {
            panic!("expected validation failure");
        };
        assert!(errors.name.is_none());
        assert_eq!(
            errors.color.as_deref(),
            Some("Choose one of the listed colors")
        );
        assert!(panel.is_open());
    }

    #[test]
    fn test_missing_color_and_name_reported_together() {
        let errors = CollectionDraft::default().validate().unwrap_err();
        assert_eq!(errors.name.as_deref(), Some("Name is required"));
        assert_eq!(errors.color.as_deref(), Some("Select a color"));
    }

    #[test]
    fn test_success_closes_resets_refreshes_and_notifies() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();

        let effects = panel.complete(Ok::<(), String>(())).unwrap();

        assert_eq!(panel.state(), &PanelState::Closed);
        assert_eq!(
            effects,
            vec![
                Effect::ResetForm,
                Effect::RefreshListing,
                Effect::Notify(Notification::collection_created()),
            ]
        );
    }

    #[test]
    fn test_failure_keeps_input_and_does_not_refresh() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();

        let effects = panel.complete(Err("connection reset")).unwrap();

        assert!(panel.is_open());
        assert_eq!(panel.draft(), Some(&groceries()));
        assert!(!effects.contains(&Effect::RefreshListing));
        assert!(!effects.contains(&Effect::ResetForm));
        assert!(effects.contains(&Effect::Notify(Notification::collection_create_failed())));
        assert!(effects.contains(&Effect::LogFailure("connection reset".to_owned())));
    }

    #[test]
    fn test_failure_message_hides_cause() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();
        let effects = panel.complete(Err("duplicate key value")).unwrap();

        for effect in effects {
            if let Effect::Notify(notification) = effect {
                assert!(!notification.description.contains("duplicate"));
                assert_eq!(notification.variant, NotificationVariant::Destructive);
            }
        }
    }

    #[test]
    fn test_retry_after_failure() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();
        panel.complete(Err("timeout")).unwrap();

        assert!(panel.submit().is_ok());
        assert!(panel.is_submitting());
    }

    #[test]
    fn test_second_submit_while_submitting_is_rejected() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();

        let err = panel.submit().unwrap_err();
        assert_eq!(
            err,
            SubmitError::Transition(TransitionError {
                action: "submit",
                state: "submitting",
            })
        );
        assert!(panel.is_submitting());
    }

    #[test]
    fn test_cancel_discards_partial_input() {
        let mut panel = CreationPanel::new();
        panel.open().unwrap();
        panel.edit(CollectionDraft::new("Half", "")).unwrap();

        let effects = panel.cancel().unwrap();
        assert_eq!(effects, vec![Effect::ResetForm]);
        assert_eq!(panel.state(), &PanelState::Closed);

        panel.open().unwrap();
        assert_eq!(panel.draft(), Some(&CollectionDraft::default()));
    }

    #[test]
    fn test_cancel_while_submitting_is_rejected() {
        let mut panel = CreationPanel::open_with(groceries());
        panel.submit().unwrap();
        assert!(panel.cancel().is_err());
        assert!(panel.open().is_err());
    }

    #[test]
    fn test_complete_without_submission_is_rejected() {
        let mut panel = CreationPanel::open_with(groceries());
        let err = panel.complete(Ok::<(), String>(())).unwrap_err();
        assert_eq!(err.to_string(), "cannot complete while the panel is open");
        assert!(panel.is_open());
    }

    #[test]
    fn test_selected_color_preview() {
        assert_eq!(
            CollectionDraft::new("", "Candy").selected_color(),
            Some(CollectionColor::Candy)
        );
        assert_eq!(CollectionDraft::new("", "").selected_color(), None);
    }

    #[test]
    fn test_notification_serializes_for_client() {
        let json = serde_json::to_value(Notification::collection_create_failed()).unwrap();
        assert_eq!(json["variant"], "destructive");
        assert_eq!(json["title"], "Error");
    }
}
