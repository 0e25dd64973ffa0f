//! Default browser-like header set

use std::collections::HashMap;

pub const DEFAULT_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";
pub const DEFAULT_CACHE_CONTROL: &str = "max-age=0";
pub const DEFAULT_CONNECTION: &str = "keep-alive";
pub const DEFAULT_REQUESTED_WITH: &str = "XMLHttpRequest";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/30.0.1599.101 Safari/537.36";

/// Header name to value mapping
pub type HeaderSet = HashMap<String, String>;

/// Referer used when none is configured
pub fn default_referer(host: &str) -> String {
    format!("http://{}/", host)
}

/// Build the fixed default header set for a host
pub fn default_headers(host: &str, referer: &str) -> HeaderSet {
    [
        ("Accept", DEFAULT_ACCEPT),
        ("Referer", referer),
        ("Cache-Control", DEFAULT_CACHE_CONTROL),
        ("Connection", DEFAULT_CONNECTION),
        ("Host", host),
        ("Origin", host),
        ("X-Requested-With", DEFAULT_REQUESTED_WITH),
        ("User-Agent", DEFAULT_USER_AGENT),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Lay `overrides` over `base`. Names compare case-insensitively.
pub fn merge_headers(mut base: HeaderSet, overrides: &HeaderSet) -> HeaderSet {
    for (name, value) in overrides {
        base.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        base.insert(name.clone(), value.clone());
    }
    base
}

/// Look up a header value ignoring name case
pub fn find_header<'a>(headers: &'a HeaderSet, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
