use crate::config::{TargetConfig, DEFAULT_CHARSET, DEFAULT_CONTENT_TYPE};
use crate::headers;
use crate::message::AdaptedMessage;
use crate::response::ReceivedResponse;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const TRANSFER_ENCODING: &str = "Transfer-Encoding";

/// Resolve the effective content type of a response. Backends are routinely
/// non-compliant here, so absence degrades through a chain of fallbacks
/// instead of failing; first success wins.
///
/// `None` means the response carries no entity body at all; that conclusion
/// is also marked on the message under construction. Every other step is a
/// pure lookup.
pub fn resolve(
    response: &ReceivedResponse,
    msg: &mut AdaptedMessage,
    config: &TargetConfig,
) -> Option<String> {
    // most backends send the header with canonical casing
    if let Some((_, value)) = response.headers.iter().find(|(key, _)| key == CONTENT_TYPE) {
        return Some(value.clone());
    }

    // backend sent it in some other casing
    if let Some(value) = response
        .headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(CONTENT_TYPE))
        .map(|(_, value)| value.clone())
    {
        return Some(value);
    }

    // an upstream layer already decided for this message
    if let Some(preset) = msg.content_type.clone() {
        return Some(preset);
    }

    if let Some(configured) = config.fallback_content_type.clone() {
        return Some(configured);
    }

    // No content-length, no transfer-encoding, or a literal zero length:
    // there is no body to interpret, pass the response through untouched.
    let content_length = headers::lookup(&response.headers, CONTENT_LENGTH);
    let transfer_encoding_present = headers::contains(&response.headers, TRANSFER_ENCODING);

    if (content_length.is_none() && !transfer_encoding_present)
        || content_length == Some("0")
    {
        msg.no_entity_body = true;
        return None;
    }

    Some(DEFAULT_CONTENT_TYPE.to_string())
}

/// Character encoding declared by a content type, or the default when the
/// type carries no charset parameter.
pub fn charset_of(content_type: &str) -> String {
    for param in content_type.split(';').skip(1) {
        let mut parts = param.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        if key.eq_ignore_ascii_case("charset") {
            if let Some(value) = parts.next() {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
    }
    DEFAULT_CHARSET.to_string()
}
