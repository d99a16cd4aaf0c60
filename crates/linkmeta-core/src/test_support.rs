//! Test doubles for the rendering and store seams.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{LookupError, ScrapeError};
use crate::render::{RenderedPage, Renderer};
use crate::store::MetaStore;

/// Serves fixed HTML per URL and counts renders.
#[derive(Clone, Default)]
pub struct StaticRenderer {
    pages: HashMap<String, RenderedPage>,
    calls: Arc<AtomicUsize>,
}

impl StaticRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page that does not redirect.
    pub fn page(self, url: &str, html: &str) -> Self {
        self.page_at(url, url, html)
    }

    /// A page that ends up at `final_url`.
    pub fn page_at(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            RenderedPage {
                html: html.to_string(),
                final_url: final_url.to_string(),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for StaticRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            })
    }
}

/// Always fails with a fixed error kind.
#[derive(Clone)]
pub struct FailingRenderer {
    kind: FailureKind,
    calls: Arc<AtomicUsize>,
}

#[derive(Clone, Copy)]
enum FailureKind {
    Timeout,
    Launch,
}

impl FailingRenderer {
    pub fn timeout() -> Self {
        Self {
            kind: FailureKind::Timeout,
            calls: Arc::default(),
        }
    }

    pub fn launch() -> Self {
        Self {
            kind: FailureKind::Launch,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for FailingRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(match self.kind {
            FailureKind::Timeout => ScrapeError::NavigationTimeout {
                url: url.to_string(),
                timeout: Duration::from_secs(15),
            },
            FailureKind::Launch => ScrapeError::Launch("chromium not found".to_string()),
        })
    }
}

/// A store whose every command fails as if the server were down.
#[derive(Clone, Default)]
pub struct UnreachableStore;

#[async_trait]
impl MetaStore for UnreachableStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, LookupError> {
        Err(LookupError::Unavailable("connection refused".to_string()))
    }

    async fn set_ex(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), LookupError> {
        Err(LookupError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), LookupError> {
        Err(LookupError::Unavailable("connection refused".to_string()))
    }
}
