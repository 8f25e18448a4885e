//! Collection route handlers.
//!
//! Every handler here returns an HTMX fragment. The creation panel is
//! re-rendered from the [`CreationPanel`] state after each transition, and
//! the effects it emits become `HX-Trigger` events.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use taskdeck_core::{
    CollectionColor, CollectionDraft, CreationPanel, DraftErrors, Effect,
};

use crate::error::{Result, add_breadcrumb};
use crate::htmx::{HX_TRIGGER, HxTrigger};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::collections::{self as service, ListingView};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Render data for the creation panel.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    pub open: bool,
    pub draft: CollectionDraft,
    pub errors: DraftErrors,
}

impl PanelView {
    /// The closed panel: just the create button.
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }

    /// Colors offered in the picker.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn colors(&self) -> &'static [CollectionColor] {
        &CollectionColor::ALL
    }

    /// Whether `color` is the one currently picked.
    #[must_use]
    pub fn is_selected(&self, color: &CollectionColor) -> bool {
        self.draft.color == color.name()
    }

    /// Style token for the confirm button, if a valid color is picked.
    #[must_use]
    pub fn confirm_style(&self) -> Option<&'static str> {
        self.draft.selected_color().map(CollectionColor::style_token)
    }
}

impl From<&CreationPanel> for PanelView {
    fn from(panel: &CreationPanel) -> Self {
        panel.draft().map_or_else(Self::closed, |draft| Self {
            open: true,
            draft: draft.clone(),
            errors: panel.errors(),
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Collection listing fragment.
#[derive(Template, WebTemplate)]
#[template(path = "collections/list.html")]
pub struct CollectionListTemplate {
    pub view: ListingView,
    pub panel: PanelView,
}

/// Creation panel fragment (open or closed).
#[derive(Template, WebTemplate)]
#[template(path = "collections/panel.html")]
pub struct PanelTemplate {
    pub panel: PanelView,
}

impl From<&CreationPanel> for PanelTemplate {
    fn from(panel: &CreationPanel) -> Self {
        Self {
            panel: PanelView::from(panel),
        }
    }
}

/// Confirm button fragment, styled with the picked color.
#[derive(Template, WebTemplate)]
#[template(path = "collections/confirm_button.html")]
pub struct ConfirmButtonTemplate {
    pub style: Option<&'static str>,
}

/// Query parameters for the confirm button preview.
#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub color: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Re-render the listing fragment.
#[instrument(skip(state, user))]
pub async fn list(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> Response {
    let view = service::load_listing(state.collections(), user.as_ref()).await;

    CollectionListTemplate {
        view,
        panel: PanelView::closed(),
    }
    .into_response()
}

/// Open the creation panel with an empty form.
///
/// # Errors
///
/// Returns [`AppError::Panel`](crate::error::AppError::Panel) if the panel
/// refuses to open.
#[instrument(skip_all)]
pub async fn new_panel(RequireAuth(_user): RequireAuth) -> Result<Response> {
    let mut panel = CreationPanel::new();
    panel.open()?;

    Ok(PanelTemplate::from(&panel).into_response())
}

/// Close the creation panel, discarding the form.
///
/// # Errors
///
/// Returns [`AppError::Panel`](crate::error::AppError::Panel) if the panel
/// refuses to close.
#[instrument(skip_all)]
pub async fn cancel_panel(RequireAuth(_user): RequireAuth) -> Result<Response> {
    let mut panel = CreationPanel::open_with(CollectionDraft::default());
    panel.cancel()?;

    Ok(PanelTemplate::from(&panel).into_response())
}

/// Live preview of the confirm button for the picked color.
pub async fn confirm_button(Query(query): Query<ConfirmQuery>) -> impl IntoResponse {
    ConfirmButtonTemplate {
        style: query
            .color
            .parse::<CollectionColor>()
            .ok()
            .map(CollectionColor::style_token),
    }
}

/// Handle the creation form.
///
/// Invalid input re-renders the open panel with a 422 and no events. A
/// failed write keeps the panel open with the entered values and raises the
/// error toast. Success closes the panel and refreshes the listing.
///
/// # Errors
///
/// Returns [`AppError::Panel`](crate::error::AppError::Panel) if the panel
/// is driven out of order; store failures are not errors here.
#[instrument(skip(state, user, draft), fields(user_id = user.id.as_i32()))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(draft): Form<CollectionDraft>,
) -> Result<Response> {
    let outcome = service::create_collection(state.collections(), &user, draft).await?;

    let fragment = PanelTemplate::from(&outcome.panel);
    if outcome.is_invalid() {
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, fragment).into_response());
    }

    let mut trigger = HxTrigger::new();
    for effect in &outcome.effects {
        match effect {
            Effect::Notify(notification) => {
                trigger.notify(notification);
            }
            Effect::RefreshListing => {
                trigger.refresh_collections();
            }
            Effect::LogFailure(cause) => {
                tracing::error!(error = %cause, "Failed to create collection");
            }
            // The closed panel renders an empty form.
            Effect::ResetForm => {}
        }
    }

    if let Some(created) = &outcome.created {
        tracing::info!(collection_id = %created.id, "Collection created");
        add_breadcrumb("collections", &format!("Created collection {}", created.id));
    }

    Ok(match trigger.header_value() {
        Some(events) => (AppendHeaders([(HX_TRIGGER, events)]), fragment).into_response(),
        None => fragment.into_response(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_panel_view() {
        let view = PanelView::from(&CreationPanel::new());
        assert!(!view.open);
        assert!(view.confirm_style().is_none());
    }

    #[test]
    fn test_open_panel_keeps_draft_and_errors() {
        let mut panel = CreationPanel::open_with(CollectionDraft::new("", "Firtree"));
        assert!(panel.submit().is_err());

        let view = PanelView::from(&panel);
        assert!(view.open);
        assert!(view.is_selected(&CollectionColor::Firtree));
        assert!(!view.is_selected(&CollectionColor::Metal));
        assert_eq!(view.confirm_style(), Some(CollectionColor::Firtree.style_token()));
        assert!(view.errors.name.is_some());
    }

    #[test]
    fn test_panel_fragment_renders_entered_values() {
        let mut panel = CreationPanel::open_with(CollectionDraft::new("", "Candy"));
        assert!(panel.submit().is_err());

        let html = PanelTemplate::from(&panel).render().unwrap();
        assert!(html.contains("id=\"collection-panel\""));
        assert!(html.contains("Name is required"));
        assert!(html.contains(" selected>Candy</option>"));
    }

    #[test]
    fn test_closed_panel_fragment_has_create_button() {
        let html = PanelTemplate::from(&CreationPanel::new()).render().unwrap();
        assert!(html.contains("data-role=\"create-collection\""));
        assert!(html.contains(">Create WorkSpace</button>"));
        assert!(!html.contains("<form"));
    }

    #[test]
    fn test_open_panel_fragment_uses_workspace_wording() {
        let html = PanelTemplate::from(&CreationPanel::open_with(CollectionDraft::default()))
            .render()
            .unwrap();
        assert!(html.contains("<h2>Add a new WorkSpace</h2>"));
        assert!(html.contains("WorkSpaces are the Way to Manage your Work"));
        assert!(html.contains("placeholder=\"Personal Name\""));
        assert!(!html.contains("Collection"));
    }

    #[test]
    fn test_confirm_button_unstyled_for_unknown_color() {
        let html = ConfirmButtonTemplate { style: None }.render().unwrap();
        assert!(html.contains("id=\"confirm-button\""));
        assert!(!html.contains("bg-gradient"));
    }
}
