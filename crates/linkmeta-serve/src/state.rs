//! Application state shared across all request handlers.

use std::sync::Arc;

use linkmeta_core::{
    ChromiumRenderer, FallbackPolicy, MemoryStore, MetaResolver, RedisStore, RenderOptions,
    Scraper, Store,
};

use crate::config::Config;

/// Resolver type used by the running service.
pub type Resolver = MetaResolver<Store, ChromiumRenderer>;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside resolver over the configured store and Chromium.
    pub resolver: Arc<Resolver>,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state, connecting to Redis when configured.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = match &config.redis_url {
            Some(url) => Store::from(RedisStore::connect(url).await?),
            None => Store::from(MemoryStore::new(config.cache_capacity)),
        };

        let renderer = ChromiumRenderer::new(render_options(&config));
        let fallbacks = if config.image_fallback {
            FallbackPolicy::standard()
        } else {
            FallbackPolicy::og_image_only()
        };
        let scraper = Scraper::new(renderer).with_fallbacks(fallbacks);

        tracing::info!(store = store.backend(), "application state initialized");

        Ok(Self {
            resolver: Arc::new(MetaResolver::new(store, scraper)),
            config: Arc::new(config),
        })
    }
}

fn render_options(config: &Config) -> RenderOptions {
    RenderOptions {
        navigation_timeout: config.navigation_timeout,
        load_policy: config.wait_until,
        chrome_executable: config.chrome_path.clone(),
        no_sandbox: config.no_sandbox,
        ..RenderOptions::default()
    }
}
