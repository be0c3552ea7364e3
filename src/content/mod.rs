//! The content engine: bilingual structured content, path addressing and
//! mutation, template inference, and form projection.
//!
//! # Architecture
//!
//! - `node`: the closed tagged-variant tree and the bilingual document
//! - `language`: the two-language type rooted at every path
//! - `path`: pure get/set/insert/delete over arbitrary paths
//! - `template`: synthesis of new list elements on "add item"
//! - `form`: derivation of editable form descriptors from a subtree
//! - `keywords`: the key-name heuristic tables shared by the engines
//! - `defaults`: the bundled default tree used as seed and fallback

pub mod defaults;
pub mod form;
pub mod keywords;
mod language;
mod node;
pub mod path;
pub mod template;

pub use language::Language;
pub use node::{ContentTree, Fields, Node};
pub use path::{Path, Segment};

use thiserror::Error;

/// Errors surfaced by the editing layer. Structural mismatches are
/// deliberately NOT here: generic tree code degrades those to logged no-ops
/// because the schema is not statically known.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The edit was rejected before touching the tree; the caller's
    /// in-memory state is intact.
    #[error("validation failed: {0}")]
    Validation(String),
}
