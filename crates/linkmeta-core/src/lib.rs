//! Link preview metadata: headless rendering, extraction, and a cache-aside
//! resolver.
//!
//! This crate provides:
//! - A Chromium [`Renderer`] that loads a page in a throwaway browser session
//! - Structured and fallback extraction of title, description, image and logo
//! - [`MetaResolver`], reading through a Redis or in-process [`Store`]
//! - Prometheus metrics helpers
//! - Shared error types

mod browser;
mod error;
pub mod extract;
pub mod metrics;
mod record;
pub mod render;
mod resolve;
mod scrape;
pub mod store;

#[cfg(test)]
mod test_support;

pub use browser::ChromiumRenderer;
pub use error::{Error, LookupError, Result, ScrapeError};
pub use extract::{Extraction, FallbackPolicy, extract_metadata};
pub use record::{MetadataRecord, ResolvedMetadata};
pub use render::{LoadPolicy, RenderOptions, RenderedPage, Renderer};
pub use resolve::MetaResolver;
pub use scrape::Scraper;
pub use store::{CACHE_TTL, MemoryStore, MetaStore, RedisStore, Store, cache_key};
