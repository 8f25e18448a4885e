//! Authentication route handlers.
//!
//! Sign-in, registration and sign-out. Failures redirect back to the form
//! with an `error` code that the page turns into a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::{AuthError, AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<&'static str>,
}

/// Map an `error` query code to the message shown on the form.
fn error_message(code: Option<&str>) -> Option<&'static str> {
    code.map(|code| match code {
        "credentials" => "Invalid email or password.",
        "email_taken" => "An account with that email already exists.",
        "invalid_email" => "Please enter a valid email address.",
        "missing_name" => "Please enter your first and last name.",
        "password_too_short" => "Password must be at least 8 characters.",
        "password_mismatch" => "Passwords do not match.",
        "session" => "We could not sign you in. Please try again.",
        _ => "Something went wrong. Please try again.",
    })
}

/// Error code for a failed registration.
const fn register_error_code(err: &AuthError) -> &'static str {
    match err {
        AuthError::UserAlreadyExists => "email_taken",
        AuthError::InvalidEmail(_) => "invalid_email",
        AuthError::MissingName => "missing_name",
        AuthError::WeakPassword(_) => "password_too_short",
        AuthError::InvalidCredentials | AuthError::Repository(_) | AuthError::PasswordHash => {
            "failed"
        }
    }
}

/// Put `user` into the session and redirect home.
async fn sign_in(session: &Session, user: &User) -> Response {
    let current = CurrentUser::from(user);
    if let Err(e) = set_current_user(session, &current).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&current.id, current.email.as_str());
    Redirect::to("/").into_response()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: error_message(query.error.as_deref()),
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match AuthService::new(state.users())
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User signed in");
            sign_in(&session, &user).await
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::debug!("Login rejected");
            Redirect::to("/auth/login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {e}");
            Redirect::to("/auth/login?error=failed").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: error_message(query.error.as_deref()),
    }
}

/// Handle registration form submission.
///
/// A new account is signed in straight away.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=password_mismatch").into_response();
    }

    let registration = Registration {
        email: &form.email,
        first_name: &form.first_name,
        last_name: &form.last_name,
        password: &form.password,
    };

    match AuthService::new(state.users()).register(registration).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            sign_in(&session, &user).await
        }
        Err(e) => {
            if e.is_server_error() {
                tracing::error!("Registration failed: {e}");
            } else {
                tracing::debug!("Registration rejected: {e}");
            }
            let code = register_error_code(&e);
            Redirect::to(&format!("/auth/register?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    clear_sentry_user();

    Redirect::to("/auth/login").into_response()
}
