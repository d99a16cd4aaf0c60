//! Error types for the scrape pipeline and the cache-aside resolver.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::MetaResolver::resolve`].
#[derive(Error, Debug)]
pub enum Error {
    /// The page could not be rendered or captured.
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// The cache store could not be read or written.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Failures while rendering a target page.
///
/// None of these are retried; a failed scrape never touches the cache.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The browser process or its CDP connection could not be started.
    #[error("failed to launch browser: {0}")]
    Launch(String),

    /// The page did not reach the load-readiness policy in time.
    #[error("navigation to {url} timed out after {}s", .timeout.as_secs())]
    NavigationTimeout {
        /// The URL being loaded.
        url: String,
        /// The bound that was exceeded.
        timeout: Duration,
    },

    /// The browser reported the navigation as failed (DNS, TLS, refused, ...).
    #[error("navigation to {url} failed: {reason}")]
    Navigation {
        /// The URL being loaded.
        url: String,
        /// Browser-provided reason.
        reason: String,
    },

    /// The rendered document could not be read back from the page.
    #[error("failed to capture rendered page: {0}")]
    Capture(String),
}

/// Failures talking to the cache store.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The store is unreachable or rejected the command.
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    /// A stored entry exists but does not decode as a metadata record.
    #[error("malformed cache entry for '{key}': {source}")]
    MalformedPayload {
        /// The cache key holding the corrupt entry.
        key: String,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// A freshly scraped record could not be encoded for storage.
    #[error("failed to encode cache entry: {0}")]
    Encode(serde_json::Error),
}

impl From<redis::RedisError> for LookupError {
    fn from(err: redis::RedisError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Capture(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_timeout_display() {
        let err = ScrapeError::NavigationTimeout {
            url: "https://example.com".to_string(),
            timeout: Duration::from_secs(15),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("15s"));
    }

    #[test]
    fn test_navigation_failed_display() {
        let err = ScrapeError::Navigation {
            url: "https://nope.invalid".to_string(),
            reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "navigation to https://nope.invalid failed: net::ERR_NAME_NOT_RESOLVED"
        );
    }

    #[test]
    fn test_malformed_payload_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = LookupError::MalformedPayload {
            key: "link-meta:https://example.com".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("malformed cache entry"));
        assert!(msg.contains("link-meta:https://example.com"));
    }

    #[test]
    fn test_error_is_transparent_over_kinds() {
        let err: Error = ScrapeError::Launch("no chrome".to_string()).into();
        assert!(matches!(err, Error::Scrape(ScrapeError::Launch(_))));
        assert_eq!(err.to_string(), "failed to launch browser: no chrome");

        let err: Error = LookupError::Unavailable("connection refused".to_string()).into();
        assert!(matches!(err, Error::Lookup(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_from_redis_error() {
        let redis_err = redis::RedisError::from((redis::ErrorKind::IoError, "broken pipe"));
        let err: LookupError = redis_err.into();
        assert!(matches!(err, LookupError::Unavailable(_)));
        assert!(err.to_string().contains("broken pipe"));
    }
}
