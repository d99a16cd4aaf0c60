//! Headless Chromium renderer.
//!
//! Every render launches its own browser with a throwaway profile directory
//! and tears it down afterwards. Nothing is pooled or shared between calls.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, NavigateParams, SetLifecycleEventsEnabledParams,
};
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::error::ScrapeError;
use crate::render::{LoadPolicy, RenderOptions, RenderedPage, Renderer};

/// Per-process counter keeping concurrent profile directories apart.
static SESSION_SEQ: AtomicU64 = AtomicU64::new(0);

/// [`Renderer`] backed by a fresh headless Chromium per call.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    options: RenderOptions,
}

impl ChromiumRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage, ScrapeError> {
        let session = BrowserSession::launch(&self.options).await?;
        let outcome = session.render(url, &self.options).await;
        session.close().await;
        outcome
    }
}

/// One launched browser plus the task driving its CDP connection.
///
/// [`BrowserSession::close`] shuts it down gracefully. If the owning future
/// is dropped first, `Drop` stops the handler task and dropping the
/// [`Browser`] kills the child process.
struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: PathBuf,
    closed: bool,
}

impl BrowserSession {
    async fn launch(options: &RenderOptions) -> Result<Self, ScrapeError> {
        let profile_dir = unique_profile_dir();
        let config = browser_config(options, &profile_dir)?;

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(launched) => launched,
            Err(e) => {
                let _ = tokio::fs::remove_dir_all(&profile_dir).await;
                return Err(ScrapeError::Launch(e.to_string()));
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::trace!(error = %e, "cdp handler event error");
                }
            }
        });

        tracing::debug!(profile = %profile_dir.display(), "browser session started");

        Ok(Self {
            browser,
            handler,
            profile_dir,
            closed: false,
        })
    }

    async fn render(&self, url: &str, options: &RenderOptions) -> Result<RenderedPage, ScrapeError> {
        let page = self.browser.new_page("about:blank").await?;

        let ready = navigate(&page, url, options.load_policy);
        match tokio::time::timeout(options.navigation_timeout, ready).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ScrapeError::NavigationTimeout {
                    url: url.to_string(),
                    timeout: options.navigation_timeout,
                });
            }
        }

        let html = page.content().await?;
        let final_url = page.url().await?.unwrap_or_else(|| url.to_string());

        Ok(RenderedPage { html, final_url })
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close command failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "waiting for browser exit failed");
        }
        self.handler.abort();
        if let Err(e) = tokio::fs::remove_dir_all(&self.profile_dir).await {
            tracing::trace!(error = %e, "profile directory cleanup failed");
        }
        self.closed = true;
        tracing::debug!("browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        tracing::debug!("browser session dropped without close, aborting");
        self.handler.abort();
        let _ = std::fs::remove_dir_all(&self.profile_dir);
    }
}

/// Navigate `page` to `url` and wait for the lifecycle event named by `policy`.
///
/// Lifecycle events are matched on the navigation's loader id so that events
/// from the initial blank document never satisfy the wait.
async fn navigate(page: &Page, url: &str, policy: LoadPolicy) -> Result<(), ScrapeError> {
    let mut events = page.event_listener::<EventLifecycleEvent>().await?;
    page.execute(SetLifecycleEventsEnabledParams::new(true)).await?;

    let navigation = page.execute(NavigateParams::new(url)).await?.result;
    if let Some(reason) = navigation.error_text {
        return Err(ScrapeError::Navigation {
            url: url.to_string(),
            reason,
        });
    }

    // Fragment-only navigations have no loader and load nothing new.
    let Some(loader_id) = navigation.loader_id else {
        return Ok(());
    };

    let wanted = policy.lifecycle_event();
    while let Some(event) = events.next().await {
        if event.loader_id == loader_id && event.name == wanted {
            return Ok(());
        }
    }

    Err(ScrapeError::Capture(
        "page closed before reaching the load policy".to_string(),
    ))
}

fn browser_config(options: &RenderOptions, profile_dir: &Path) -> Result<BrowserConfig, ScrapeError> {
    let mut builder = BrowserConfig::builder()
        .user_data_dir(profile_dir)
        .request_timeout(options.navigation_timeout)
        .arg(format!("--user-agent={}", options.user_agent));

    if let Some(path) = &options.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    if options.no_sandbox {
        builder = builder.no_sandbox();
    }

    builder.build().map_err(ScrapeError::Launch)
}

fn unique_profile_dir() -> PathBuf {
    let seq = SESSION_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("linkmeta-chromium-{}-{seq}", std::process::id()))
}
