//! End-to-end collection listing and creation.

use reqwest::StatusCode;

use taskdeck_integration_tests::{BoxError, TestServer, hx_trigger};

#[tokio::test]
async fn test_health() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;

    let response = server.client.get(server.url("/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "ok");

    let response = server.client.get(server.url("/health/ready")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_signed_out_home_shows_error_view() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;

    let html = server.client.get(server.url("/")).send().await?.text().await?;
    assert!(html.contains("data-state=\"error\""));
    assert!(!html.contains("data-role=\"create-collection\""));
    Ok(())
}

#[tokio::test]
async fn test_register_create_and_relist() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;

    // Registration redirects to the home page, which the client follows.
    let home = server
        .register("u1@example.com", "Una", "One")
        .await?;
    assert!(home.contains("Welcome, Una One"));
    assert!(home.contains("There are no WorkSpaces on your Domain"));
    assert_eq!(home.matches("data-role=\"create-collection\"").count(), 1);
    assert!(!home.contains("data-collection-id"));

    let response = server.create_collection("Groceries", "Sunset").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = hx_trigger(&response).ok_or("missing HX-Trigger")?;
    assert_eq!(trigger["notify"]["title"], "Success");
    assert_eq!(trigger["collections-changed"], true);
    let panel = response.text().await?;
    assert!(!panel.contains("<form"));

    let listing = server.listing().await?;
    assert_eq!(listing.matches("data-collection-id=").count(), 1);
    assert!(listing.contains("Groceries"));

    server.create_collection("Work", "Metal").await?;
    let listing = server.listing().await?;
    assert_eq!(listing.matches("data-collection-id=").count(), 2);
    let groceries = listing.find("Groceries").ok_or("missing Groceries")?;
    let work = listing.find("Work").ok_or("missing Work")?;
    assert!(groceries < work);
    Ok(())
}

#[tokio::test]
async fn test_invalid_input_creates_nothing() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;
    server.register("u2@example.com", "Dos", "Two").await?;

    let response = server.create_collection("", "Sunset").await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(hx_trigger(&response).is_none());

    let response = server.create_collection("Work", "Chartreuse").await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await?.contains("Choose one of the listed colors"));

    assert_eq!(server.store.collection_write_attempts(), 0);
    assert!(server.listing().await?.contains("There are no WorkSpaces"));
    Ok(())
}

#[tokio::test]
async fn test_failed_write_keeps_panel_open() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;
    server.register("u3@example.com", "Tres", "Three").await?;
    server.store.set_fail_writes(true);

    let response = server.create_collection("Groceries", "Sunset").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = hx_trigger(&response).ok_or("missing HX-Trigger")?;
    assert_eq!(trigger["notify"]["variant"], "destructive");
    assert!(trigger.get("collections-changed").is_none());

    let panel = response.text().await?;
    assert!(panel.contains("<form"));
    assert!(panel.contains("value=\"Groceries\""));

    server.store.set_fail_writes(false);
    let response = server.create_collection("Groceries", "Sunset").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(server.listing().await?.matches("data-collection-id=").count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_users_see_only_their_collections() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;
    server.register("alice@example.com", "Alice", "Able").await?;
    server.create_collection("Secret plans", "Candy").await?;

    server.client.post(server.url("/auth/logout")).send().await?;
    let home = server.register("bob@example.com", "Bob", "Baker").await?;
    assert!(home.contains("Welcome, Bob Baker"));

    let listing = server.listing().await?;
    assert!(!listing.contains("Secret plans"));
    assert!(listing.contains("There are no WorkSpaces"));
    Ok(())
}

#[tokio::test]
async fn test_create_without_session_is_unauthorized() -> Result<(), BoxError> {
    let server = TestServer::spawn().await?;

    let response = server.create_collection("Groceries", "Sunset").await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(server.store.collection_write_attempts(), 0);
    Ok(())
}
