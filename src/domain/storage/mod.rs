//! Persistence boundary: whole-collection JSON documents under fixed keys.
//!
//! - `MemoryCollectionStore`: process-local storage (default)
//! - `RedisCollectionStore`: one Redis string per collection
//!
//! Use `create_collection_store()` to pick the backend from configuration.

mod backend;
mod factory;
mod memory_backend;
mod redis_backend;

pub use backend::{Collection, CollectionKey, CollectionStore, StoreError};
pub use factory::create_collection_store;
pub use memory_backend::MemoryCollectionStore;
pub use redis_backend::RedisCollectionStore;
