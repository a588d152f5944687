//! In-memory stores for local runs and tests

use super::{DocumentStore, ObjectStore, StoreError};
use crate::price::PriceDocument;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Document store backed by a map
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<String, PriceDocument>>,
    writes: AtomicUsize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing documents
    pub fn with_documents(docs: impl IntoIterator<Item = (String, PriceDocument)>) -> Self {
        Self {
            docs: RwLock::new(docs.into_iter().collect()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of merge writes performed
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, id: &str) -> Result<Option<PriceDocument>, StoreError> {
        Ok(self.docs.read().await.get(id).cloned())
    }

    async fn merge(&self, id: &str, doc: &PriceDocument) -> Result<(), StoreError> {
        self.docs
            .write()
            .await
            .entry(id.to_string())
            .or_default()
            .merge(doc.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// An uploaded blob
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Object store backed by a map
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
