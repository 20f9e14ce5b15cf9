//! URL host classification: internal endpoints are skipped without a
//! network call during emulator probing.

use std::net::{Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlClass {
    pub url: String,
    pub likely_internal: bool,
    /// URL scheme, `None` when the URL does not parse at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// Classify a candidate probe URL. Unparseable URLs are reported as
/// non-internal; the probe itself will fail and record the reason.
pub fn classify_url(url: &str) -> UrlClass {
    match Url::parse(url) {
        Ok(parsed) => UrlClass {
            url: url.to_string(),
            likely_internal: parsed.host_str().is_some_and(is_private_host),
            protocol: Some(parsed.scheme().to_string()),
        },
        Err(_) => UrlClass {
            url: url.to_string(),
            likely_internal: false,
            protocol: None,
        },
    }
}

/// RFC1918 ranges, loopback, link-local, `.local` mDNS names and bare
/// hostnames all count as internal.
pub fn is_private_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    if h == "localhost" || h.ends_with(".local") {
        return true;
    }
    if let Ok(ip) = h.parse::<Ipv4Addr>() {
        let [a, b, _, _] = ip.octets();
        return a == 10
            || a == 127
            || (a == 169 && b == 254)
            || (a == 172 && (16..=31).contains(&b))
            || (a == 192 && b == 168);
    }
    if let Ok(ip) = h.trim_start_matches('[').trim_end_matches(']').parse::<Ipv6Addr>() {
        return ip.is_loopback();
    }
    !h.contains('.')
}
