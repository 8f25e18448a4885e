//! Taskdeck web application.
//!
//! Server-rendered collection dashboard: axum routes, Askama templates and
//! HTMX fragments over `PostgreSQL` (or in-memory) stores. Exposed as a
//! library so the CLI and the integration tests can build the same app.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod htmx;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
