use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Collection, CollectionBackend, StoreError};

/// Process-local backend for tests. Writes to selected collections can be
/// made to fail.
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<Collection, Vec<u8>>>,
    failing_writes: RwLock<HashSet<Collection>>,
}

impl MemoryBackend {
    /// Stores raw bytes for `collection`, bypassing failure injection.
    pub async fn seed(&self, collection: Collection, contents: Vec<u8>) {
        self.collections.write().await.insert(collection, contents);
    }

    pub async fn fail_writes(&self, collection: Collection) {
        self.failing_writes.write().await.insert(collection);
    }

    pub async fn restore_writes(&self, collection: Collection) {
        self.failing_writes.write().await.remove(&collection);
    }
}

#[async_trait]
impl CollectionBackend for MemoryBackend {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn exists(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.collections.read().await.contains_key(&collection))
    }

    async fn read(&self, collection: Collection) -> Result<Vec<u8>, StoreError> {
        self.collections.read().await.get(&collection).cloned().ok_or_else(|| {
            let reason = "collection was never provisioned".to_string();
            StoreError::Unavailable { collection, reason }
        })
    }

    async fn write(&self, collection: Collection, contents: &[u8]) -> Result<(), StoreError> {
        if self.failing_writes.read().await.contains(&collection) {
            return Err(StoreError::Write { collection, reason: "injected write failure".into() });
        }
        self.collections.write().await.insert(collection, contents.to_vec());
        Ok(())
    }
}
