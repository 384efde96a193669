//! Shared Redis connection for the collection store.
//!
//! A `ConnectionManager` is opened on first use and reconnects on its own;
//! the circuit breaker fails commands fast while Redis keeps erroring.

use std::future::Future;
use std::sync::Arc;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError, RedisResult};
use tokio::sync::OnceCell;

use crate::config::RedisConfig;

use super::CircuitBreaker;

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Redis error: {0}")]
    Redis(#[from] RedisError),

    #[error("Circuit breaker is open")]
    CircuitOpen,
}

pub struct RedisPool {
    client: Client,
    manager: OnceCell<ConnectionManager>,
    circuit_breaker: Arc<CircuitBreaker>,
}

impl RedisPool {
    pub fn new(config: &RedisConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, PoolError> {
        Ok(Self {
            client: Client::open(config.url.as_str())?,
            manager: OnceCell::new(),
            circuit_breaker,
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, PoolError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                let manager = ConnectionManager::new(self.client.clone()).await?;
                tracing::info!("Redis store connection established");
                Ok::<_, RedisError>(manager)
            })
            .await?;
        Ok(manager.clone())
    }

    async fn run<T, F, Fut>(&self, command: F) -> Result<T, PoolError>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        if !self.circuit_breaker.allow_request() {
            return Err(PoolError::CircuitOpen);
        }

        let result = match self.connection().await {
            Ok(conn) => command(conn).await.map_err(PoolError::from),
            Err(e) => Err(e),
        };

        match &result {
            Ok(_) => self.circuit_breaker.record_success(),
            Err(_) => self.circuit_breaker.record_failure(),
        }
        result
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, PoolError> {
        let key = key.to_string();
        self.run(|mut conn| async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    pub async fn set(&self, key: &str, value: String) -> Result<(), PoolError> {
        let key = key.to_string();
        self.run(|mut conn| async move { conn.set::<_, _, ()>(key, value).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = RedisConfig {
            url: "not a redis url".to_string(),
            ..RedisConfig::default()
        };
        let result = RedisPool::new(&config, Arc::new(CircuitBreaker::new()));
        assert!(matches!(result, Err(PoolError::Redis(_))));
    }

    #[tokio::test]
    async fn test_open_circuit_fails_fast() {
        let cb = Arc::new(CircuitBreaker::new());
        let pool = RedisPool::new(&RedisConfig::default(), cb.clone()).unwrap();

        for _ in 0..5 {
            cb.record_failure();
        }

        assert!(matches!(pool.get("any").await, Err(PoolError::CircuitOpen)));
        assert!(matches!(
            pool.set("any", "{}".to_string()).await,
            Err(PoolError::CircuitOpen)
        ));
    }
}
