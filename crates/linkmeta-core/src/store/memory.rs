//! In-process store backed by moka.
//!
//! Used when no Redis URL is configured. Entries carry their own TTL so the
//! store honours whatever `set_ex` is given, and a replacement restarts the
//! clock just like `SET ... EX` does.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;

use super::MetaStore;
use crate::error::LookupError;

/// Default cache capacity (number of entries).
/// Records are small JSON objects, typically well under 2KB each.
pub const DEFAULT_CAPACITY: u64 = 10_000;

#[derive(Clone, Debug)]
struct StoredValue {
    json: Arc<str>,
    ttl: Duration,
}

/// Expire each entry after the TTL it was written with.
struct WrittenTtl;

impl Expiry<String, StoredValue> for WrittenTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-memory [`MetaStore`].
#[derive(Clone)]
pub struct MemoryStore {
    cache: Cache<String, StoredValue>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl MemoryStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(WrittenTtl)
            .build();

        tracing::info!(cache_capacity = max_capacity, "in-memory store initialized");

        Self { cache }
    }
}

#[async_trait]
impl MetaStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, LookupError> {
        Ok(self.cache.get(key).await.map(|v| v.json.to_string()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), LookupError> {
        let value = StoredValue {
            json: Arc::from(value),
            ttl,
        };
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), LookupError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: Duration = Duration::from_secs(600);

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryStore::new(10);
        assert!(store.get("link-meta:nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new(10);
        store.set_ex("key", "{\"a\":1}", LONG).await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_set_replaces_value() {
        let store = MemoryStore::new(10);
        store.set_ex("key", "old", LONG).await.unwrap();
        store.set_ex("key", "new", LONG).await.unwrap();
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = MemoryStore::new(10);
        store
            .set_ex("key", "value", Duration::from_millis(50))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replacement_resets_ttl() {
        let store = MemoryStore::new(10);
        store
            .set_ex("key", "short", Duration::from_millis(50))
            .await
            .unwrap();
        store.set_ex("key", "long", LONG).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.get("key").await.unwrap().as_deref(), Some("long"));
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_noop() {
        let store = MemoryStore::new(10);
        store.delete("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let store = MemoryStore::new(10);
        store.set_ex("key", "value", LONG).await.unwrap();
        store.delete("key").await.unwrap();
        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new(10);
        let clone = store.clone();
        store.set_ex("key", "value", LONG).await.unwrap();
        assert_eq!(clone.get("key").await.unwrap().as_deref(), Some("value"));
    }
}
