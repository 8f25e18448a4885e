//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! taskdeck user create -e ada@example.com -f Ada -l Lovelace -p 'analytical-engine'
//! ```

use thiserror::Error;

use taskdeck_core::UserId;
use taskdeck_web::db::{self, PgUserStore};
use taskdeck_web::services::auth::{AuthError, AuthService, Registration};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// The user could not be registered.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a user with a password.
///
/// Applies the same validation as the registration form.
///
/// # Errors
///
/// Returns `UserError::Auth` for invalid input or an email already in use.
pub async fn create(registration: Registration<'_>) -> Result<UserId, UserError> {
    let database_url =
        super::database_url().ok_or(UserError::MissingEnvVar(super::DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;
    let users = PgUserStore::new(pool);

    let user = AuthService::new(&users).register(registration).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        user.id,
        user.email
    );
    Ok(user.id)
}
