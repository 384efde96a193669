//! Collection store factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::redis::pool::RedisPool;
use crate::redis::RedisHealth;

use super::backend::CollectionStore;
use super::memory_backend::MemoryCollectionStore;
use super::redis_backend::RedisCollectionStore;

/// Create a collection store based on configuration.
///
/// - `"redis"`: a `RedisCollectionStore` if a Redis pool is provided; its
///   load/save outcomes are reported to `redis_health`
/// - `"memory"` (default): a `MemoryCollectionStore`
///
/// ```rust,ignore
/// let store = create_collection_store(&settings.storage, Some(pool), health.clone());
/// ```
pub fn create_collection_store(
    settings: &StorageConfig,
    redis_pool: Option<Arc<RedisPool>>,
    redis_health: Arc<RedisHealth>,
) -> Arc<dyn CollectionStore> {
    match settings.backend.as_str() {
        "redis" => {
            if let Some(pool) = redis_pool {
                tracing::info!(
                    backend = "redis",
                    prefix = %settings.redis_prefix,
                    "Creating Redis collection store"
                );
                Arc::new(RedisCollectionStore::new(
                    pool,
                    redis_health,
                    settings.redis_prefix.clone(),
                ))
            } else {
                tracing::warn!(
                    "Redis collection store requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryCollectionStore::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory collection store");
            Arc::new(MemoryCollectionStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        let store = create_collection_store(&StorageConfig::default(), None, Arc::default());
        assert_eq!(store.backend_type(), "memory");
    }

    #[test]
    fn test_redis_without_pool_falls_back() {
        let settings = StorageConfig {
            backend: "redis".to_string(),
            ..StorageConfig::default()
        };
        let store = create_collection_store(&settings, None, Arc::default());
        assert_eq!(store.backend_type(), "memory");
    }
}
