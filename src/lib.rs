//! Chat Migrate - rebuild ChatGPT export transcripts and repackage them.
//!
//! An export stores each conversation as a tree of message nodes. This
//! crate walks the active branch back into a linear transcript and splits
//! it into size-bounded "migration packets" formatted for another
//! assistant's context window.

pub mod application;
pub mod domain;
pub mod infrastructure;
