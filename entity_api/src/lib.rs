//! Owner-scoped CRUD and query operations over the `entity` models.
//!
//! Every finder in this crate takes the owner's id and filters on it; there
//! is deliberately no unscoped variant, so a caller cannot reach another
//! owner's records through this layer.

pub mod error;
pub mod folder;
pub mod meeting;
pub mod user;

// Re-exports from the `entity` crate so that higher layers do not need to
// depend on `entity` directly.
pub use entity::{folders, meeting_status, meetings, users, Id};
