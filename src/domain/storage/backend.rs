//! Backend trait for collection storage.
//!
//! Every entity kind is persisted as one JSON document (the whole collection)
//! under a fixed logical key. Backends only move those documents around; the
//! typed view lives in [`Collection`].

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during collection store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Redis operation failed
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Stored document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend is temporarily unavailable (e.g., circuit breaker open)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Fixed logical keys, one per entity collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Subscribers,
    Notifications,
}

impl CollectionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Subscribers => "email_subscribers",
            CollectionKey::Notifications => "email_notifications",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole-document key-value storage.
///
/// Single writer per key; no partial updates and no transactions across
/// collections. Implementations must be `Send + Sync` as they are shared by
/// every repository.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Backend type identifier ("memory", "redis")
    fn backend_type(&self) -> &'static str;

    /// Read the raw JSON document; `None` when the key was never written.
    async fn load_raw(&self, key: CollectionKey) -> Result<Option<String>, StoreError>;

    /// Replace the raw JSON document.
    async fn save_raw(&self, key: CollectionKey, document: String) -> Result<(), StoreError>;
}

/// Typed handle over one collection of a [`CollectionStore`].
pub struct Collection<T> {
    store: Arc<dyn CollectionStore>,
    key: CollectionKey,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn CollectionStore>, key: CollectionKey) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Load the whole collection; `None` when the key is absent.
    pub async fn load(&self) -> Result<Option<Vec<T>>, StoreError> {
        match self.store.load_raw(self.key).await? {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    /// Replace the whole collection.
    pub async fn save(&self, items: &[T]) -> Result<(), StoreError> {
        let document = serde_json::to_string(items)?;
        self.store.save_raw(self.key, document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys() {
        assert_eq!(CollectionKey::Subscribers.as_str(), "email_subscribers");
        assert_eq!(CollectionKey::Notifications.to_string(), "email_notifications");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Unavailable("Circuit breaker is open".to_string());
        assert_eq!(err.to_string(), "Backend unavailable: Circuit breaker is open");
    }
}
