//! Shared application state.
//!
//! The server holds the single admin edit session: a buffer with the
//! current in-memory tree. Mutations edit the buffer; commit hands the full
//! buffer to the active persistence adapter. The buffer survives failed
//! commits, so nothing typed is lost on a persistence error.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::config::{Config, ContentBackend};
use crate::content::defaults::default_tree;
use crate::content::ContentTree;
use crate::db::Database;
use crate::media::BlobStorage;
use crate::store::{self, ContentStore, MemoryStore, ModuleFileStore, RemoteDocStore};
use crate::sync::ThreadWatcher;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub store: Arc<dyn ContentStore>,
    pub default_tree: ContentTree,
    /// The admin edit buffer. Exclusively owned by this process; the
    /// backing store is still last-writer-wins across processes.
    pub buffer: Arc<RwLock<ContentTree>>,
    pub watcher: Arc<ThreadWatcher>,
    pub blob: Option<Arc<BlobStorage>>,
}

impl AppState {
    pub async fn initialize(config: Config) -> Result<Self> {
        let db = Database::new(&config.database_path)?;
        let default = default_tree();
        let store = build_store(&config, default.clone());
        let initial = store::load_or_default(store.as_ref(), &default).await;
        let watcher = Arc::new(ThreadWatcher::new(db.clone()));
        let blob = config.blob_storage_url.as_ref().map(|url| {
            Arc::new(BlobStorage::new(
                url.clone(),
                config.blob_storage_api_key.clone(),
            ))
        });

        Ok(Self {
            config: Arc::new(config),
            db,
            store,
            default_tree: default,
            buffer: Arc::new(RwLock::new(initial)),
            watcher,
            blob,
        })
    }
}

/// Construct the configured persistence adapter. The default tree is passed
/// in explicitly; adapters never reach for it through a global.
pub fn build_store(config: &Config, default: ContentTree) -> Arc<dyn ContentStore> {
    match config.content_backend {
        ContentBackend::Memory => Arc::new(MemoryStore::new(default)),
        ContentBackend::ModuleFile => {
            Arc::new(ModuleFileStore::new(config.content_module_path.clone()))
        }
        ContentBackend::Remote => Arc::new(RemoteDocStore::new(
            config.remote_content_url.as_deref().unwrap_or_default(),
            &config.remote_document_id,
            config.remote_content_api_key.clone(),
            default,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_build_store_selects_backend() {
        let mut config = test_config();
        assert_eq!(build_store(&config, default_tree()).name(), "memory");

        config.content_backend = ContentBackend::ModuleFile;
        assert_eq!(build_store(&config, default_tree()).name(), "module-file");

        config.content_backend = ContentBackend::Remote;
        config.remote_content_url = Some("https://docs.example.com".to_string());
        assert_eq!(build_store(&config, default_tree()).name(), "remote-document");
    }

    #[tokio::test]
    async fn test_initialize_seeds_buffer_from_store() {
        let config = test_config();
        let state = AppState::initialize(config).await.expect("initialize");
        assert_eq!(*state.buffer.read().await, default_tree());
    }
}
