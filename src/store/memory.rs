//! In-memory content store.
//!
//! The zero-infrastructure fallback: serves a constructor-supplied default
//! and keeps commits in process memory only. Committed content is lost on
//! restart; the other adapters use this one's default as their seed value.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::content::ContentTree;
use crate::store::{ContentStore, StoreError};

pub struct MemoryStore {
    current: RwLock<ContentTree>,
}

impl MemoryStore {
    pub fn new(default: ContentTree) -> Self {
        Self {
            current: RwLock::new(default),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn load(&self) -> Result<ContentTree, StoreError> {
        Ok(self.current.read().await.clone())
    }

    async fn commit(&self, tree: &ContentTree) -> Result<(), StoreError> {
        *self.current.write().await = tree.clone();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
