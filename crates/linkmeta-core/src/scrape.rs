//! Scrape orchestrator: render a page, then extract its metadata.

use std::time::Instant;

use tracing::instrument;

use crate::error::ScrapeError;
use crate::extract::{Extraction, FallbackPolicy, extract_metadata};
use crate::record::MetadataRecord;
use crate::render::{RenderedPage, Renderer};

/// Renders pages with `R` and turns them into [`MetadataRecord`]s.
pub struct Scraper<R> {
    renderer: R,
    extraction: Extraction,
    fallbacks: FallbackPolicy,
}

impl<R: Renderer> Scraper<R> {
    /// Standard extraction and fallback chains.
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            extraction: Extraction::standard(),
            fallbacks: FallbackPolicy::standard(),
        }
    }

    pub fn with_extraction(mut self, extraction: Extraction) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_fallbacks(mut self, fallbacks: FallbackPolicy) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render `target_url` and extract a best-effort record.
    ///
    /// Missing fields are not errors. Only rendering can fail.
    #[instrument(level = "debug", skip_all, fields(url = %target_url))]
    pub async fn fetch_metadata(&self, target_url: &str) -> Result<MetadataRecord, ScrapeError> {
        let started = Instant::now();
        let result = self.renderer.render(target_url).await;
        let elapsed = started.elapsed().as_secs_f64();

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                metrics::counter!("linkmeta_scrapes_total", "outcome" => "error").increment(1);
                tracing::warn!(error = %e, elapsed_secs = elapsed, "scrape failed");
                return Err(e);
            }
        };

        let record = self.extract(&page);

        metrics::counter!("linkmeta_scrapes_total", "outcome" => "ok").increment(1);
        metrics::histogram!("linkmeta_scrape_duration_seconds").record(elapsed);
        tracing::debug!(
            final_url = %page.final_url,
            elapsed_secs = elapsed,
            has_title = record.title.is_some(),
            has_image = record.image.is_some(),
            "scrape complete"
        );

        Ok(record)
    }

    /// Run the extraction passes over an already rendered page.
    pub fn extract(&self, page: &RenderedPage) -> MetadataRecord {
        extract_metadata(&page.html, &page.final_url, &self.extraction, &self.fallbacks)
    }
}
