//! Link metadata endpoint.

use axum::Json;
use axum::extract::{Query, State};

use linkmeta_core::ResolvedMetadata;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `GET /meta`.
///
/// Built from the raw pairs so repeated keys never reject the request; the
/// first occurrence of each key wins.
#[derive(Debug, Default)]
pub struct MetaQuery {
    /// Page to describe, used verbatim as the cache key suffix.
    pub url: Option<String>,
    /// Any non-empty value bypasses the cache.
    pub refresh: Option<String>,
}

impl MetaQuery {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "url" => &mut query.url,
                "refresh" => &mut query.refresh,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    fn target(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    fn wants_refresh(&self) -> bool {
        self.refresh.as_deref().is_some_and(|r| !r.is_empty())
    }
}

/// `GET /meta?url=<url>&refresh=<any>`
pub async fn get_meta(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ResolvedMetadata>, ApiError> {
    let query = MetaQuery::from_pairs(pairs);
    let url = query.target().ok_or(ApiError::MissingUrl)?;
    let refresh = query.wants_refresh();

    let resolved = state.resolver.resolve(url, refresh).await?;

    tracing::info!(
        url = %url,
        cached = resolved.cached,
        refreshed = resolved.refreshed,
        "metadata served"
    );

    Ok(Json(resolved))
}
