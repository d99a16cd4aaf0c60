//! Prometheus metrics helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use linkmeta_core::metrics::{init_metrics, start_metrics_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = init_metrics();
//!     start_metrics_server(9091, handle).await.unwrap();
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: `linkmeta_`
//! - Suffix: unit or type (`_total`, `_seconds`)
//! - Labels: only `outcome` on scrape counts

use std::net::SocketAddr;

use axum::{Router, routing::get};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe every metric.
///
/// Fails if a recorder is already installed.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Like [`init_metrics`] but returns `None` if a recorder is already installed.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    init_metrics().ok()
}

/// Serve `/metrics` on `port` from a background task.
///
/// The listener is bound before returning so a taken port is reported to the
/// caller.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

fn register_metrics() {
    // =========================================================================
    // Cache
    // =========================================================================

    describe_counter!("linkmeta_cache_hits_total", "Lookups served from the store");
    describe_counter!(
        "linkmeta_cache_misses_total",
        "Lookups that found no entry and scraped"
    );
    describe_counter!(
        "linkmeta_cache_refreshes_total",
        "Lookups that bypassed the store on request"
    );
    describe_counter!(
        "linkmeta_lookup_errors_total",
        "Store reads or writes that failed"
    );

    // =========================================================================
    // Scraping
    // =========================================================================

    describe_counter!(
        "linkmeta_scrapes_total",
        "Page renders attempted (label: outcome)"
    );
    describe_histogram!(
        "linkmeta_scrape_duration_seconds",
        "Time spent rendering a page in the browser"
    );
}
