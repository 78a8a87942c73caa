//! Header rewriting for forwarded requests and relayed responses.

use super::rules::ForwardTarget;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONNECTION, CONTENT_LENGTH, COOKIE, HOST,
    ORIGIN,
};

/// Connection-scoped headers that never cross a proxy hop.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

fn is_hop_by_hop(name: &HeaderName, listed: &[String]) -> bool {
    let name = name.as_str();
    HOP_BY_HOP.contains(&name) || listed.iter().any(|l| l == name)
}

/// Header names the sender listed in `Connection`, lowercased.
fn connection_listed(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let listed = connection_listed(headers);
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name, &listed) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Headers for the outbound request.
///
/// With `change_origin` the `Host` header (and `Origin`, when the browser
/// sent one) name the target instead of the dev server. Without
/// `forward_credentials` cookies and authorization are dropped.
pub fn prepare_request_headers(inbound: &HeaderMap, target: &ForwardTarget) -> HeaderMap {
    let mut headers = strip_hop_by_hop(inbound);
    // The client recomputes it from the buffered body
    headers.remove(CONTENT_LENGTH);

    if target.change_origin {
        if let Ok(host) = HeaderValue::from_str(target.target.authority()) {
            headers.insert(HOST, host);
        }
        if headers.contains_key(ORIGIN) {
            if let Ok(origin) = HeaderValue::from_str(target.target.as_str()) {
                headers.insert(ORIGIN, origin);
            }
        }
    }

    if !target.forward_credentials {
        headers.remove(COOKIE);
        headers.remove(AUTHORIZATION);
    }

    headers
}

/// Headers relayed back to the browser from the upstream response.
/// `Content-Length` is kept so HEAD answers still report the entity size.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    strip_hop_by_hop(upstream)
}
