//! URL policy helpers for entity classification.

use url::{Host, Url};

/// Scheme used by browser-extension origins.
pub const CHROME_EXTENSION_SCHEME: &str = "chrome-extension";

/// Parse a URL string, returning `None` when it is structurally invalid.
pub fn parse(url: &str) -> Option<Url> {
    Url::parse(url).ok()
}

/// Whether placeholder web entities may be synthesized for this URL's scheme.
pub fn is_protocol_allowed(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Whether this URL belongs to a browser extension.
pub fn is_chrome_extension(url: &Url) -> bool {
    url.scheme() == CHROME_EXTENSION_SCHEME
}

/// The extension origin (`chrome-extension://<host>`) of an extension URL.
pub fn chrome_extension_origin(url: &Url) -> Option<String> {
    let host = chrome_extension_host(url)?;
    Some(format!("{CHROME_EXTENSION_SCHEME}://{host}"))
}

/// The host identifier of an extension URL.
pub fn chrome_extension_host(url: &Url) -> Option<&str> {
    if is_chrome_extension(url) {
        url.host_str()
    } else {
        None
    }
}

/// Public-suffix-aware registrable domain of a web URL's host, with
/// subdomains stripped.
///
/// IP hosts and hosts without a registrable domain (bare public suffixes,
/// single-label hosts like `localhost`) yield `None`.
pub fn root_domain(url: &Url) -> Option<String> {
    match url.host() {
        Some(Host::Domain(domain)) => psl::domain_str(domain).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_parse_rejects_invalid_urls() {
        assert!(parse("not a url").is_none());
        assert!(parse("https://example.com/a").is_some());
    }

    #[test]
    fn test_protocol_allow_list() {
        assert!(is_protocol_allowed(&url("http://example.com/")));
        assert!(is_protocol_allowed(&url("https://example.com/")));
        assert!(!is_protocol_allowed(&url("data:text/plain,hi")));
        assert!(!is_protocol_allowed(&url("about:blank")));
        assert!(!is_protocol_allowed(&url("chrome-extension://abc123/script.js")));
    }

    #[test]
    fn test_chrome_extension_origin() {
        assert_eq!(
            chrome_extension_origin(&url("chrome-extension://abc123/script.js")).as_deref(),
            Some("chrome-extension://abc123")
        );
        assert!(chrome_extension_origin(&url("https://example.com/")).is_none());
    }

    #[test]
    fn test_root_domain_strips_subdomains() {
        assert_eq!(
            root_domain(&url("https://sub.example.com/a")).as_deref(),
            Some("example.com")
        );
        assert_eq!(
            root_domain(&url("https://example.com/")).as_deref(),
            Some("example.com")
        );
    }

    #[test]
    fn test_root_domain_handles_multi_label_suffixes() {
        assert_eq!(
            root_domain(&url("https://www.example.co.uk/x")).as_deref(),
            Some("example.co.uk")
        );
    }

    #[test]
    fn test_root_domain_rejects_underivable_hosts() {
        assert!(root_domain(&url("https://192.168.0.1/")).is_none());
        assert!(root_domain(&url("https://[::1]/")).is_none());
        assert!(root_domain(&url("https://localhost/")).is_none());
    }
}
