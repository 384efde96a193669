//! Redis-based collection store backend.
//!
//! Each collection is a plain string value at `{prefix}:{collection key}`.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::metrics::BackendMetrics;
use crate::redis::pool::{PoolError, RedisPool};
use crate::redis::RedisHealth;

use super::backend::{CollectionKey, CollectionStore, StoreError};

const BACKEND: &str = "redis";

pub struct RedisCollectionStore {
    pool: Arc<RedisPool>,
    health: Arc<RedisHealth>,
    prefix: String,
}

impl RedisCollectionStore {
    pub fn new(pool: Arc<RedisPool>, health: Arc<RedisHealth>, prefix: String) -> Self {
        Self {
            pool,
            health,
            prefix,
        }
    }

    fn document_key(&self, key: CollectionKey) -> String {
        format!("{}:{}", self.prefix, key.as_str())
    }

    fn map_error(err: PoolError) -> StoreError {
        match err {
            PoolError::Redis(e) => StoreError::Redis(e),
            PoolError::CircuitOpen => StoreError::Unavailable("Circuit breaker is open".to_string()),
        }
    }

    fn observe<T>(&self, operation: &str, start: Instant, result: &Result<T, PoolError>) {
        BackendMetrics::record_latency(BACKEND, operation, start.elapsed().as_secs_f64());
        match result {
            Ok(_) => self.health.record_success(),
            Err(e) => {
                BackendMetrics::record_error(BACKEND, operation);
                let rejected = matches!(e, PoolError::CircuitOpen);
                self.health.record_failure(operation, &e.to_string(), rejected);
            }
        }
    }
}

#[async_trait]
impl CollectionStore for RedisCollectionStore {
    fn backend_type(&self) -> &'static str {
        BACKEND
    }

    async fn load_raw(&self, key: CollectionKey) -> Result<Option<String>, StoreError> {
        let redis_key = self.document_key(key);
        let start = Instant::now();
        let result = self.pool.get(&redis_key).await;
        self.observe("load", start, &result);

        result.map_err(|e| {
            tracing::warn!(key = %redis_key, error = %e, "Failed to load collection from Redis");
            Self::map_error(e)
        })
    }

    async fn save_raw(&self, key: CollectionKey, document: String) -> Result<(), StoreError> {
        let redis_key = self.document_key(key);
        let start = Instant::now();
        let bytes = document.len();
        let result = self.pool.set(&redis_key, document).await;
        self.observe("save", start, &result);

        result.map_err(|e| {
            tracing::warn!(key = %redis_key, error = %e, "Failed to save collection to Redis");
            Self::map_error(e)
        })?;

        tracing::debug!(key = %redis_key, bytes, "Collection saved to Redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedisConfig;
    use crate::redis::{CircuitBreaker, RedisHealthStatus};

    fn create_store(breaker: Arc<CircuitBreaker>) -> (RedisCollectionStore, Arc<RedisHealth>) {
        let pool = RedisPool::new(&RedisConfig::default(), breaker).unwrap();
        let health = Arc::new(RedisHealth::new());
        let store =
            RedisCollectionStore::new(Arc::new(pool), health.clone(), "test-mailer".to_string());
        (store, health)
    }

    #[test]
    fn test_document_key() {
        let (store, _) = create_store(Arc::new(CircuitBreaker::new()));
        assert_eq!(
            store.document_key(CollectionKey::Subscribers),
            "test-mailer:email_subscribers"
        );
    }

    #[test]
    fn test_circuit_open_maps_to_unavailable() {
        let err = RedisCollectionStore::map_error(PoolError::CircuitOpen);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_rejected_load_is_reported_to_health() {
        let breaker = Arc::new(CircuitBreaker::new());
        for _ in 0..5 {
            breaker.record_failure();
        }
        let (store, health) = create_store(breaker);

        let result = store.load_raw(CollectionKey::Notifications).await;
        assert!(matches!(result, Err(StoreError::Unavailable(_))));

        let stats = health.stats();
        assert_eq!(stats.status, RedisHealthStatus::CircuitOpen);
        assert_eq!(stats.consecutive_failures, 1);
        assert_eq!(
            stats.last_error.as_deref(),
            Some("load: Circuit breaker is open")
        );
    }
}
