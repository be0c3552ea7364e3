//! Persistence adapters for the content tree.
//!
//! Three interchangeable backends implement the same two operations. They do
//! NOT share update semantics: the memory store is process-local, the module
//! file store rewrites the whole file, and the remote document store merges
//! top-level keys. Callers must know which adapter they hold; a partial tree
//! handed to the file store would erase everything it omits.
//!
//! All three are last-writer-wins. Two editors committing concurrently can
//! silently clobber each other; there is no locking or version token, which
//! mirrors how the published site has always behaved.

pub mod memory;
pub mod module_file;
pub mod remote_doc;

pub use memory::MemoryStore;
pub use module_file::ModuleFileStore;
pub use remote_doc::RemoteDocStore;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::content::ContentTree;

/// Failure of a load or commit. Always returned, never thrown past the
/// adapter boundary; the message is suitable for a user-facing banner.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{0}")]
    Backend(String),
}

/// A storage backend for the full bilingual tree.
///
/// `commit` always receives a full, current tree, never a sparse diff.
/// A failed commit leaves the previously stored content intact so the
/// caller can retry; callers should re-`load` before retrying, since the
/// snapshot they hold may have gone stale.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn load(&self) -> Result<ContentTree, StoreError>;
    async fn commit(&self, tree: &ContentTree) -> Result<(), StoreError>;

    /// Short backend name for logs and the health endpoint.
    fn name(&self) -> &'static str;
}

/// Load from `store`, degrading to `default` with a warning on failure so
/// the UI stays usable on last-known-good content.
pub async fn load_or_default(store: &dyn ContentStore, default: &ContentTree) -> ContentTree {
    match store.load().await {
        Ok(tree) => tree,
        Err(err) => {
            warn!(store = store.name(), error = %err, "Content load failed; serving default tree");
            default.clone()
        }
    }
}
