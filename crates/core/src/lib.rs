//! Taskdeck Core - Shared domain types.
//!
//! Used by the `web` server and the `cli` tools. Contains only types and
//! pure logic: no I/O, no database access, no HTTP.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, the collection color palette, validated names and emails
//! - [`creation`] - The collection creation form schema and panel state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod creation;
pub mod types;

pub use creation::{
    CollectionDraft, CreationPanel, DraftErrors, Effect, NewCollection, Notification,
    NotificationVariant, PanelState, SubmitError, TransitionError,
};
pub use types::*;
