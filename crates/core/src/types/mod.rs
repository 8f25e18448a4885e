//! Core types for Taskdeck.

pub mod color;
pub mod email;
pub mod id;
pub mod name;

pub use color::{CollectionColor, ColorError};
pub use email::{Email, EmailError};
pub use id::*;
pub use name::{CollectionName, CollectionNameError};
