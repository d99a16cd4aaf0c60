//! Key-value stores holding serialized metadata records.
//!
//! The resolver only needs three single-round-trip operations, mirroring the
//! Redis commands it issues in production:
//!
//! | Operation | Redis |
//! |-----------|-------|
//! | [`MetaStore::get`] | `GET key` |
//! | [`MetaStore::set_ex`] | `SET key value EX ttl` |
//! | [`MetaStore::delete`] | `DEL key` |
//!
//! Keys are `link-meta:` followed by the caller's URL exactly as given.

mod memory;
mod redis_store;

pub use self::memory::{DEFAULT_CAPACITY, MemoryStore};
pub use self::redis_store::RedisStore;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::LookupError;

/// Namespace prefix for every cache key.
pub const CACHE_KEY_PREFIX: &str = "link-meta:";

/// How long a scraped record stays cached.
pub const CACHE_TTL: Duration = Duration::from_secs(600);

/// Build the cache key for `url`. No normalization is applied.
pub fn cache_key(url: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{url}")
}

/// Minimal string store with per-entry expiry.
#[async_trait]
pub trait MetaStore: Send + Sync {
    /// Read a value; `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, LookupError>;

    /// Write a value, replacing any existing entry and its expiry.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LookupError>;

    /// Remove a value. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), LookupError>;
}

/// Store backend chosen at startup.
#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Redis(RedisStore),
}

impl Store {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }
}

#[async_trait]
impl MetaStore for Store {
    async fn get(&self, key: &str) -> Result<Option<String>, LookupError> {
        match self {
            Self::Memory(store) => store.get(key).await,
            Self::Redis(store) => store.get(key).await,
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LookupError> {
        match self {
            Self::Memory(store) => store.set_ex(key, value, ttl).await,
            Self::Redis(store) => store.set_ex(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), LookupError> {
        match self {
            Self::Memory(store) => store.delete(key).await,
            Self::Redis(store) => store.delete(key).await,
        }
    }
}

impl From<MemoryStore> for Store {
    fn from(store: MemoryStore) -> Self {
        Self::Memory(store)
    }
}

impl From<RedisStore> for Store {
    fn from(store: RedisStore) -> Self {
        Self::Redis(store)
    }
}
