//! Domain normalization
//!
//! Every key entering or querying the filter goes through [`normalize_domain`]
//! first, on both the build and the lookup side.
//!
//! # Examples
//!
//! ```
//! use veil_core::domain::{normalize_domain, registered_domain};
//!
//! assert_eq!(normalize_domain(".DoubleClick.NET"), "doubleclick.net");
//! assert_eq!(registered_domain("stats.g.doubleclick.net"), "doubleclick.net");
//! ```

use std::borrow::Cow;
use std::fmt;

/// Lower-case a domain and strip its leading dots.
///
/// Borrows when the input is already normalized, so queries with clean keys
/// stay allocation-free.
pub fn normalize_domain(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim_start_matches('.');
    if trimmed.chars().any(char::is_uppercase) {
        Cow::Owned(trimmed.to_lowercase())
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// A normalized domain: lower-case, no leading dot, at least one interior dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Normalize and validate a raw domain string.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_domain(raw.trim());
        if normalized.is_empty() || !normalized.contains('.') {
            return None;
        }
        if normalized.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(normalized.into_owned()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registered domain (last two labels) of a hostname.
///
/// Deliberately simplified: multi-label public suffixes such as `co.uk` are
/// not recognised.
pub fn registered_domain(host: &str) -> &str {
    let host = host.trim_end_matches('.');
    let mut dots = host.rmatch_indices('.');
    dots.next();
    match dots.next() {
        Some((idx, _)) => &host[idx + 1..],
        None => host,
    }
}

/// Extract the host from a URL without allocating.
pub fn extract_host(url: &str) -> Option<&str> {
    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let end = rest
        .find(|c| c == '/' || c == '?' || c == '#')
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    let authority = authority.rsplit('@').next().unwrap_or(authority);
    let host = match authority.rfind(':') {
        Some(idx) if !authority.starts_with('[') => &authority[..idx],
        _ => authority,
    };
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercases_and_strips_dots() {
        assert_eq!(normalize_domain("Example.COM"), "example.com");
        assert_eq!(normalize_domain(".example.com"), "example.com");
        assert_eq!(normalize_domain("..example.com"), "example.com");
    }

    #[test]
    fn test_normalize_borrows_clean_input() {
        assert!(matches!(normalize_domain("example.com"), Cow::Borrowed(_)));
        assert!(matches!(normalize_domain(".example.com"), Cow::Borrowed(_)));
        assert!(matches!(normalize_domain("Example.com"), Cow::Owned(_)));
    }

    #[test]
    fn test_domain_requires_dot() {
        assert!(Domain::parse("localhost").is_none());
        assert!(Domain::parse("").is_none());
        assert!(Domain::parse(".").is_none());
        assert_eq!(Domain::parse(" .Tracker.IO ").unwrap().as_str(), "tracker.io");
    }

    #[test]
    fn test_registered_domain() {
        assert_eq!(registered_domain("a.b.example.com"), "example.com");
        assert_eq!(registered_domain("example.com"), "example.com");
        assert_eq!(registered_domain("localhost"), "localhost");
        assert_eq!(registered_domain("metrics.site.com."), "site.com");
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(extract_host("https://ads.example.com/x?y"), Some("ads.example.com"));
        assert_eq!(extract_host("http://user@host.io:8080/"), Some("host.io"));
        assert_eq!(extract_host("tracker.net/pixel"), Some("tracker.net"));
        assert_eq!(extract_host("https:///path"), None);
    }
}
