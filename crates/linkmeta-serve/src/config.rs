//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use linkmeta_core::LoadPolicy;
use linkmeta_core::store::DEFAULT_CAPACITY;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3001").
    pub bind_addr: String,

    /// Redis connection URL. `None` selects the in-process store.
    pub redis_url: Option<String>,

    /// Maximum entries held by the in-process store.
    pub cache_capacity: u64,

    /// Upper bound on reaching the load policy.
    pub navigation_timeout: Duration,

    /// Lifecycle event that marks a page as loaded.
    pub wait_until: LoadPolicy,

    /// Fall back to the first `<img>` when a page has no `og:image`.
    pub image_fallback: bool,

    /// Chromium executable; auto-detected when unset.
    pub chrome_path: Option<PathBuf>,

    /// Launch Chromium with `--no-sandbox` (needed in most containers).
    pub no_sandbox: bool,

    /// Port for the Prometheus `/metrics` listener, if any.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `LINKMETA_BIND_ADDR`: Server bind address (default: "0.0.0.0:3001")
    /// - `REDIS_URL`: Redis URL (default: in-process store)
    /// - `LINKMETA_CACHE_CAPACITY`: In-process store capacity (default: 10000)
    /// - `LINKMETA_NAVIGATION_TIMEOUT_SECS`: Navigation bound (default: 15)
    /// - `LINKMETA_WAIT_UNTIL`: `domcontentloaded`, `load` or `networkidle` (default: networkidle)
    /// - `LINKMETA_IMAGE_FALLBACK`: First `<img>` image fallback (default: true)
    /// - `CHROME_PATH`: Chromium executable
    /// - `LINKMETA_NO_SANDBOX`: Disable the Chromium sandbox (default: false)
    /// - `LINKMETA_METRICS_PORT`: Prometheus listener port
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("LINKMETA_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        let redis_url = non_empty_var("REDIS_URL");

        let cache_capacity = parse_var("LINKMETA_CACHE_CAPACITY")?.unwrap_or(DEFAULT_CAPACITY);

        let navigation_timeout = parse_var::<u64>("LINKMETA_NAVIGATION_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(linkmeta_core::render::NAVIGATION_TIMEOUT);
        if navigation_timeout.is_zero() {
            anyhow::bail!("LINKMETA_NAVIGATION_TIMEOUT_SECS must be greater than zero");
        }

        let wait_until = match non_empty_var("LINKMETA_WAIT_UNTIL") {
            Some(raw) => LoadPolicy::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid LINKMETA_WAIT_UNTIL: {e}"))?,
            None => LoadPolicy::default(),
        };

        let image_fallback = parse_flag("LINKMETA_IMAGE_FALLBACK")?.unwrap_or(true);

        let chrome_path = non_empty_var("CHROME_PATH").map(PathBuf::from);

        let no_sandbox = parse_flag("LINKMETA_NO_SANDBOX")?.unwrap_or(false);

        let metrics_port = parse_var("LINKMETA_METRICS_PORT")?;

        tracing::info!(
            bind_addr = %bind_addr,
            store = if redis_url.is_some() { "redis" } else { "memory" },
            cache_capacity,
            navigation_timeout_secs = navigation_timeout.as_secs(),
            wait_until = ?wait_until,
            image_fallback,
            chrome_path = ?chrome_path,
            no_sandbox,
            metrics_port = ?metrics_port,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            redis_url,
            cache_capacity,
            navigation_timeout,
            wait_until,
            image_fallback,
            chrome_path,
            no_sandbox,
            metrics_port,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    non_empty_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("invalid {key}: '{raw}'"))
        })
        .transpose()
}

fn parse_flag(key: &str) -> anyhow::Result<Option<bool>> {
    non_empty_var(key)
        .map(|raw| match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow::anyhow!("invalid {key}: '{raw}' (expected true or false)")),
        })
        .transpose()
}
