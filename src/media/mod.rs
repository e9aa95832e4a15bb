//! # Media Discovery Module
//!
//! Finds the video templates and audio tracks a batch run works from.
//! Only the file extension is inspected; contents are never opened.

pub mod discovery;
pub mod types;

pub use discovery::discover;
pub use types::{MediaFile, MediaKind};
