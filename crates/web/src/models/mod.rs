//! Domain models.
//!
//! Validated domain objects, separate from database row types.

pub mod collection;
pub mod session;
pub mod user;

pub use collection::{Collection, CollectionWithTasks, Task};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
