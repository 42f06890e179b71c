//! Business logic for the MeetNotes platform: the AI enrichment pipeline,
//! the tolerant model-output parsing it relies on, and the calendar
//! synchronization merge.
//!
//! This crate re-exports various items from the `entity_api` crate so that
//! consumers of `domain` (the web layer) do not need to depend on
//! `entity_api` or `entity` directly.

pub use entity_api::{folders, meeting_status, meetings, users, Id};

pub mod action_items;
pub mod audio;
pub mod calendar_sync;
pub mod enrichment;
pub mod error;
pub mod extract;
pub mod folder;
pub mod meeting;
pub mod qa;
pub mod smart_summary;
pub mod summary;
pub mod topics;

pub mod gateway;
