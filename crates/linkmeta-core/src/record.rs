//! Link preview record and the response envelope built around it.

use serde::{Deserialize, Serialize};

/// Best-effort metadata for one page.
///
/// Every field but `url` is optional. A record with nothing but a URL is still
/// a valid result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Canonical URL if the page declares one, otherwise the final URL after redirects.
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

impl MetadataRecord {
    /// An empty record for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// True when no descriptive field was found.
    pub fn is_bare(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.logo.is_none()
    }
}

/// A record as returned to callers, with flags describing how it was obtained.
///
/// The flags are never stored; only the inner record is cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    #[serde(flatten)]
    pub record: MetadataRecord,
    /// Served from the store without rendering.
    pub cached: bool,
    /// The caller asked to bypass the store.
    pub refreshed: bool,
}

impl ResolvedMetadata {
    /// A record read back from the store.
    pub fn cached(record: MetadataRecord) -> Self {
        Self {
            record,
            cached: true,
            refreshed: false,
        }
    }

    /// A record produced by a scrape during this request.
    pub fn fresh(record: MetadataRecord, refreshed: bool) -> Self {
        Self {
            record,
            cached: false,
            refreshed,
        }
    }
}
