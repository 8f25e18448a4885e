//! CLI command implementations.

pub mod migrate;
pub mod user;

use secrecy::SecretString;

/// Environment variable holding the database URL.
const DATABASE_URL_VAR: &str = "TASKDECK_DATABASE_URL";

/// Read the database URL from the environment (or `.env`).
///
/// Falls back to the conventional `DATABASE_URL`.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.trim().is_empty())
        .map(SecretString::from)
}
