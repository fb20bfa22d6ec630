use hyper::{StatusCode, Uri};

use crate::config::TargetConfig;
use crate::headers::RawHeaders;

pub const LOCATION: &str = "Location";

/// Status codes whose Location header passes through untouched: the
/// conventional redirects, plus 201 whose Location points at the created
/// resource rather than a redirect target.
const PASSTHROUGH_STATUS: [StatusCode; 5] = [
    StatusCode::CREATED,
    StatusCode::MOVED_PERMANENTLY,
    StatusCode::FOUND,
    StatusCode::SEE_OTHER,
    StatusCode::TEMPORARY_REDIRECT,
];

/// Rewrite the Location header so the frontend's externally visible path
/// prefix survives a backend-issued redirect. Works on the adaptation's
/// working copy of the headers, never the received mapping itself.
///
/// Returns the pre-rewrite Location value whenever one was present, including
/// on the pass-through paths, so the caller can stash it on the message.
///
/// With no service prefix configured the header stays removed.
pub fn rewrite_location(
    headers: &mut RawHeaders,
    status: StatusCode,
    service_prefix: Option<&str>,
    config: &TargetConfig,
) -> Option<String> {
    let original = crate::headers::lookup(headers, LOCATION)?.to_string();

    if PASSTHROUGH_STATUS.contains(&status) || config.is_preserved(LOCATION) {
        return Some(original);
    }

    let url_context = match original.parse::<Uri>() {
        Ok(uri) if uri.scheme().is_some() => uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_default(),
        _ => {
            // a relative path is not an error, use the value as-is
            tracing::debug!("relative URL received for Location: {}", original);
            original.clone()
        }
    };

    headers.retain(|(key, _)| !key.eq_ignore_ascii_case(LOCATION));

    if let Some(prefix) = service_prefix {
        let url_context = url_context.strip_prefix('/').unwrap_or(&url_context);
        headers.push((LOCATION.to_string(), format!("{}{}", prefix, url_context)));
    }

    Some(original)
}
