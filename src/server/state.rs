use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::notification::{create_transport, EmailTransport, NotificationDispatcher, NotificationLog};
use crate::redis::pool::{PoolError, RedisPool};
use crate::redis::{CircuitBreaker, CircuitBreakerConfig, RedisHealth};
use crate::storage::{create_collection_store, CollectionStore};
use crate::subscriber::SubscriberStore;
use crate::template::TemplateCatalog;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<dyn CollectionStore>,
    pub subscribers: Arc<SubscriberStore>,
    pub notifications: Arc<NotificationLog>,
    pub templates: Arc<TemplateCatalog>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub redis_pool: Option<Arc<RedisPool>>,
    pub redis_health: Arc<RedisHealth>,
    pub redis_circuit_breaker: Arc<CircuitBreaker>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the state from configuration: collection store backend,
    /// email transport and the repositories on top of them.
    pub fn new(settings: Settings) -> Result<Self, PoolError> {
        let redis_circuit_breaker = Arc::new(CircuitBreaker::with_config(
            CircuitBreakerConfig::from(&settings.redis),
        ));
        let redis_health = Arc::new(RedisHealth::new());

        let redis_pool = if settings.storage.backend == "redis" {
            Some(Arc::new(RedisPool::new(
                &settings.redis,
                redis_circuit_breaker.clone(),
            )?))
        } else {
            None
        };

        let store =
            create_collection_store(&settings.storage, redis_pool.clone(), redis_health.clone());
        let transport = create_transport(&settings.mailer);

        let mut state = Self::with_backends(settings, store, transport);
        state.redis_pool = redis_pool;
        state.redis_health = redis_health;
        state.redis_circuit_breaker = redis_circuit_breaker;
        Ok(state)
    }

    /// Build the state over an explicit store and transport.
    pub fn with_backends(
        settings: Settings,
        store: Arc<dyn CollectionStore>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        let subscribers = Arc::new(SubscriberStore::new(
            store.clone(),
            settings.storage.seed_examples,
        ));
        let notifications = Arc::new(NotificationLog::new(store.clone()));
        let templates = Arc::new(TemplateCatalog::builtin());
        let dispatcher = Arc::new(NotificationDispatcher::from_settings(
            &settings,
            subscribers.clone(),
            notifications.clone(),
            templates.clone(),
            transport,
        ));

        Self {
            settings: Arc::new(settings),
            store,
            subscribers,
            notifications,
            templates,
            dispatcher,
            redis_pool: None,
            redis_health: Arc::new(RedisHealth::new()),
            redis_circuit_breaker: Arc::new(CircuitBreaker::new()),
            start_time: Instant::now(),
        }
    }

    /// True when the store backend depends on Redis
    pub fn uses_redis(&self) -> bool {
        self.redis_pool.is_some()
    }
}
