//! End-to-end tests for Taskdeck.
//!
//! Each test spawns the real application on `127.0.0.1:0` with the
//! in-memory stores and drives it over HTTP with a cookie-keeping client.
//!
//! ```bash
//! cargo test -p taskdeck-integration-tests
//! ```

use std::net::SocketAddr;

use reqwest::Client;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use taskdeck_web::config::TaskdeckConfig;
use taskdeck_web::db::MemoryStore;
use taskdeck_web::middleware::create_memory_session_layer;
use taskdeck_web::state::AppState;

/// Boxed error for test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A running application plus a client bound to it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    pub client: Client,
    handle: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    /// Start the application on an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot bind or the client cannot be
    /// built.
    pub async fn spawn() -> Result<Self, BoxError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{addr}");

        let config = TaskdeckConfig::from_lookup(|key| match key {
            "TASKDECK_DATABASE_URL" => Some("postgres://localhost/taskdeck_test".to_owned()),
            "TASKDECK_BASE_URL" => Some(base_url.clone()),
            "TASKDECK_PORT" => Some(addr.port().to_string()),
            _ => None,
        })?;

        let store = MemoryStore::new();
        let app = taskdeck_web::app(
            AppState::in_memory(config, store.clone()),
            create_memory_session_layer(false),
        );

        let handle = tokio::spawn(async move { axum::serve(listener, app).await });

        let client = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            addr,
            store,
            client,
            handle,
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Register and sign in a user; the session cookie stays in the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn register(&self, email: &str, first: &str, last: &str) -> Result<String, BoxError> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .form(&[
                ("email", email),
                ("first_name", first),
                ("last_name", last),
                ("password", "analytical-engine"),
                ("password_confirm", "analytical-engine"),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }

    /// Submit the creation form the way htmx does.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn create_collection(
        &self,
        name: &str,
        color: &str,
    ) -> Result<reqwest::Response, BoxError> {
        Ok(self
            .client
            .post(self.url("/collections"))
            .header("hx-request", "true")
            .form(&[("name", name), ("color", color)])
            .send()
            .await?)
    }

    /// Fetch the listing fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn listing(&self) -> Result<String, BoxError> {
        Ok(self
            .client
            .get(self.url("/collections/list"))
            .header("hx-request", "true")
            .send()
            .await?
            .text()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Parse the `HX-Trigger` header of `response`, if present.
#[must_use]
pub fn hx_trigger(response: &reqwest::Response) -> Option<serde_json::Value> {
    response
        .headers()
        .get("hx-trigger")
        .and_then(|value| serde_json::from_slice(value.as_bytes()).ok())
}
