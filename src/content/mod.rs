//! Content module - the post being composed and its persisted draft

pub mod draft;
mod post;

pub use draft::DraftStore;
pub use post::{parse_tags, Post};
