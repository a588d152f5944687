//! Storage module
//!
//! Price documents live in a document store keyed by delivery date; a
//! MessagePack copy of each day is published to an object store. Both are
//! passed explicitly to the query API and the ingestion job.

mod firestore;
mod gcs;
mod memory;

pub use firestore::FirestoreStore;
pub use gcs::GcsStore;
pub use memory::{MemoryDocumentStore, MemoryObjectStore, StoredObject};

use crate::config::{StoreBackend, StoreConfig};
use crate::price::PriceDocument;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Backend answered with an error status
    #[error("store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Backend response did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),
    /// Backend rejected or could not complete the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Date-keyed price document storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document for a `yyyy-mm-dd` id
    async fn get(&self, id: &str) -> Result<Option<PriceDocument>, StoreError>;
    /// Merge fields into the document, creating it when absent
    async fn merge(&self, id: &str, doc: &PriceDocument) -> Result<(), StoreError>;
}

/// Blob storage for distribution files
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `body` under `key`, replacing any existing object
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError>;
}

/// Store handles built from configuration
#[derive(Clone)]
pub struct Stores {
    pub documents: Arc<dyn DocumentStore>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Stores {
    /// Build the configured backends
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        match config.backend {
            StoreBackend::Firestore => {
                if config.project_id.is_empty() {
                    return Err(StoreError::Unavailable(
                        "store.project_id (or PROJECT_ID) is not set".to_string(),
                    ));
                }
                Ok(Self {
                    documents: Arc::new(FirestoreStore::new(config)?),
                    objects: Arc::new(GcsStore::new(config)?),
                })
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory stores, nothing will be persisted");
                Ok(Self {
                    documents: Arc::new(MemoryDocumentStore::new()),
                    objects: Arc::new(MemoryObjectStore::new()),
                })
            }
        }
    }
}
