//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password registration and sign-in
//! - `collections` - Collection listing decision and the creation workflow

pub mod auth;
pub mod collections;
