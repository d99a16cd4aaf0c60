//! Cache-aside controller in front of the scraper.
//!
//! ```text
//! refresh? ── yes ──> DEL key ──────────────┐
//!    │                                      v
//!    no ──> GET key ── miss ──────────> scrape ── ok ──> SET key EX ttl ──> fresh
//!              │                            │
//!             hit ──> cached               err ──> error (store untouched)
//! ```

use std::time::Duration;

use crate::error::{LookupError, Result};
use crate::record::{MetadataRecord, ResolvedMetadata};
use crate::render::Renderer;
use crate::scrape::Scraper;
use crate::store::{CACHE_TTL, MetaStore, cache_key};

/// Resolves URLs to metadata, reading through a [`MetaStore`].
pub struct MetaResolver<S, R> {
    store: S,
    scraper: Scraper<R>,
    ttl: Duration,
}

impl<S: MetaStore, R: Renderer> MetaResolver<S, R> {
    pub fn new(store: S, scraper: Scraper<R>) -> Self {
        Self {
            store,
            scraper,
            ttl: CACHE_TTL,
        }
    }

    /// Override the entry lifetime. Production always uses [`CACHE_TTL`].
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scraper(&self) -> &Scraper<R> {
        &self.scraper
    }

    /// Return metadata for `url`, from the store when possible.
    ///
    /// With `refresh` set, any stored entry is deleted before scraping, so a
    /// failed refresh leaves the key empty. Scrape failures never write to
    /// the store.
    pub async fn resolve(&self, url: &str, refresh: bool) -> Result<ResolvedMetadata> {
        let key = cache_key(url);

        if refresh {
            metrics::counter!("linkmeta_cache_refreshes_total").increment(1);
            self.store.delete(&key).await.inspect_err(lookup_failed)?;
            tracing::debug!(key = %key, "cache entry dropped for refresh");
        } else if let Some(record) = self.lookup(&key).await? {
            metrics::counter!("linkmeta_cache_hits_total").increment(1);
            tracing::debug!(key = %key, "cache hit");
            return Ok(ResolvedMetadata::cached(record));
        } else {
            metrics::counter!("linkmeta_cache_misses_total").increment(1);
            tracing::debug!(key = %key, "cache miss, scraping");
        }

        let record = self.scraper.fetch_metadata(url).await?;
        self.persist(&key, &record).await?;

        Ok(ResolvedMetadata::fresh(record, refresh))
    }

    async fn lookup(&self, key: &str) -> Result<Option<MetadataRecord>> {
        let Some(json) = self.store.get(key).await.inspect_err(lookup_failed)? else {
            return Ok(None);
        };

        let record = serde_json::from_str(&json)
            .map_err(|source| LookupError::MalformedPayload {
                key: key.to_string(),
                source,
            })
            .inspect_err(lookup_failed)?;

        Ok(Some(record))
    }

    async fn persist(&self, key: &str, record: &MetadataRecord) -> Result<()> {
        let json = serde_json::to_string(record)
            .map_err(LookupError::Encode)
            .inspect_err(lookup_failed)?;

        self.store
            .set_ex(key, &json, self.ttl)
            .await
            .inspect_err(lookup_failed)?;

        tracing::debug!(key = %key, ttl_secs = self.ttl.as_secs(), "cache entry stored");
        Ok(())
    }
}

fn lookup_failed(err: &LookupError) {
    metrics::counter!("linkmeta_lookup_errors_total").increment(1);
    tracing::warn!(error = %err, "cache store operation failed");
}
