//! Backend address resolution and endpoint building.

use url::Url;

use super::fetch::FetchError;
use crate::config::UpstreamConfig;

/// Used when no API prefix is configured.
pub const DEFAULT_BACKEND_BASE: &str = "http://0.0.0.0:3000";

/// Upstream base URL for the current configuration.
///
/// `API_PREFIX` from the environment has already been folded into
/// `config.api_prefix` by the loader. An empty prefix counts as unset.
pub fn resolve_backend_base(config: &UpstreamConfig) -> &str {
    config
        .api_prefix
        .as_deref()
        .filter(|prefix| !prefix.is_empty())
        .unwrap_or(DEFAULT_BACKEND_BASE)
}

/// Join path segments and query pairs onto `base`.
///
/// Each segment is percent-encoded as a single path segment, so an ID can
/// never introduce extra path components.
pub fn endpoint<S: AsRef<str>>(
    base: &str,
    segments: &[S],
    query: &[(&str, String)],
) -> Result<String, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", base, e)))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(format!("{}: cannot be a base", base)))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment.as_ref());
        }
    }

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok(url.to_string())
}
