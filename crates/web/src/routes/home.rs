//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::routes::collections::PanelView;
use crate::services::collections::{ListingView, load_listing};
use crate::state::AppState;

/// Home page template: welcome header plus the collection listing.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub view: ListingView,
    pub panel: PanelView,
}

/// Display the home page.
#[instrument(skip(state, user))]
pub async fn home(State(state): State<AppState>, OptionalAuth(user): OptionalAuth) -> impl IntoResponse {
    let view = load_listing(state.collections(), user.as_ref()).await;

    HomeTemplate {
        user,
        view,
        panel: PanelView::closed(),
    }
}
