//! Linkmeta Serve - HTTP API for link preview metadata
//!
//! Renders pages in headless Chromium, extracts title, description, image and
//! logo, and caches the result for ten minutes in Redis or in process.
//!
//! # Architecture
//!
//! - **Config**: Environment-driven settings
//! - **AppState**: Shared resolver and configuration
//! - **Routes**: `/`, `/health` and `/meta` handlers

mod config;
mod error;
mod routes;
mod state;

pub use self::config::Config;
pub use self::error::ApiError;
pub use self::routes::{MetaQuery, router};
pub use self::state::{AppState, Resolver};
