//! Route definitions for the metadata service.
//!
//! ## Routes
//!
//! - `GET /` - Plain-text liveness banner
//! - `GET /health` - Health check (JSON)
//! - `GET /meta?url=<url>&refresh=<any>` - Link preview metadata

mod health;
mod meta;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub use self::meta::MetaQuery;

/// Build the complete service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::banner))
        .route("/health", get(health::health_check))
        .route("/meta", get(meta::get_meta))
        .with_state(state)
}
