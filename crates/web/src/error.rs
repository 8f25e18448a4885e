//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry and logged before a sanitized response is sent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use taskdeck_core::TransitionError;
use thiserror::Error;

/// Application-level error type.
///
/// Store and auth failures never surface here: listings degrade to the
/// error view, creation failures become a toast, and auth forms redirect
/// with an error code. What is left is a handler driving the creation
/// panel out of order.
#[derive(Debug, Error)]
pub enum AppError {
    /// The creation panel rejected a transition.
    #[error("Panel transition failed: {0}")]
    Panel(#[from] TransitionError),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Panel(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    const fn public_message(&self) -> &'static str {
        match self {
            Self::Panel(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        (self.status(), self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Associate subsequent Sentry events with a signed-in user.
pub fn set_sentry_user(user_id: &impl ToString, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

/// Stop associating Sentry events with a user (sign-out).
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a user action as a Sentry breadcrumb.
pub fn add_breadcrumb(category: &str, message: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_owned()),
        message: Some(message.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use taskdeck_core::{CollectionDraft, CreationPanel};

    use super::*;

    /// Editing a closed panel is not a valid transition.
    fn out_of_order() -> AppError {
        let err = CreationPanel::new()
            .edit(CollectionDraft::new("Groceries", "Sunset"))
            .unwrap_err();
        AppError::from(err)
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            out_of_order().to_string(),
            "Panel transition failed: cannot edit while the panel is closed"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            out_of_order().into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = out_of_order().into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), b"Internal server error");
    }
}
