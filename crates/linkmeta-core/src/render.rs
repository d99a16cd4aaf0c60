//! Page rendering seam.
//!
//! The scrape orchestrator only needs rendered HTML and the final URL. The
//! production implementation is [`crate::browser::ChromiumRenderer`]; tests
//! substitute static pages.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;

/// Desktop Chrome user agent sent by every rendering session.
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Upper bound on waiting for a page to become ready.
pub const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Serialized DOM after scripts ran.
    pub html: String,
    /// URL the page ended up at after redirects.
    pub final_url: String,
}

/// Produces rendered HTML for a URL.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, url: &str) -> Result<RenderedPage, ScrapeError>;
}

/// How far a page must load before its HTML is captured.
///
/// `NetworkIdle` waits for client-rendered content and is the slowest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    DomContentLoaded,
    Load,
    #[default]
    NetworkIdle,
}

impl LoadPolicy {
    /// Name of the CDP `Page.lifecycleEvent` that satisfies this policy.
    pub fn lifecycle_event(self) -> &'static str {
        match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Load => "load",
            Self::NetworkIdle => "networkIdle",
        }
    }
}

impl FromStr for LoadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "domcontentloaded" => Ok(Self::DomContentLoaded),
            "load" => Ok(Self::Load),
            "networkidle" => Ok(Self::NetworkIdle),
            other => Err(format!(
                "invalid load policy '{other}'. Valid options: domcontentloaded, load, networkidle"
            )),
        }
    }
}

/// Settings for each rendering session.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub user_agent: String,
    pub navigation_timeout: Duration,
    pub load_policy: LoadPolicy,
    /// Chromium binary; auto-detected when `None`.
    pub chrome_executable: Option<PathBuf>,
    /// Pass `--no-sandbox` (needed in most containers).
    pub no_sandbox: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            navigation_timeout: NAVIGATION_TIMEOUT,
            load_policy: LoadPolicy::default(),
            chrome_executable: None,
            no_sandbox: false,
        }
    }
}
