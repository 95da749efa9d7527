//! Request URLs built from a base URL and caller-supplied path segments

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("Base URL {0:?} cannot carry a path")]
    CannotBeABase(String),
    #[error("Path segment {0:?} is not a resource name")]
    DotSegment(String),
}

/// Appends `segments` to the path of `base`, percent-encoding each one.
///
/// Every segment stays a single path segment: `/`, `%`, `?` and `#` are
/// encoded, and `.` or `..` (which would be dropped) are rejected.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, EndpointError> {
    if let Some(segment) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
        return Err(EndpointError::DotSegment(segment.to_string()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| EndpointError::CannotBeABase(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
