//! In-memory collection store backend using DashMap.
//!
//! Documents live for the lifetime of the process.

use std::time::Instant;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::metrics::BackendMetrics;

use super::backend::{CollectionKey, CollectionStore, StoreError};

const BACKEND: &str = "memory";

#[derive(Default)]
pub struct MemoryCollectionStore {
    documents: DashMap<CollectionKey, String>,
}

impl MemoryCollectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryCollectionStore {
    fn backend_type(&self) -> &'static str {
        BACKEND
    }

    async fn load_raw(&self, key: CollectionKey) -> Result<Option<String>, StoreError> {
        let start = Instant::now();
        let document = self.documents.get(&key).map(|d| d.value().clone());
        BackendMetrics::record_latency(BACKEND, "load", start.elapsed().as_secs_f64());
        Ok(document)
    }

    async fn save_raw(&self, key: CollectionKey, document: String) -> Result<(), StoreError> {
        let start = Instant::now();
        let size = document.len();
        self.documents.insert(key, document);
        BackendMetrics::record_latency(BACKEND, "save", start.elapsed().as_secs_f64());

        tracing::trace!(key = %key, bytes = size, "Collection saved in memory");
        Ok(())
    }
}
