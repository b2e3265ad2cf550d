//! Tracker Lookup Layer
//!
//! This is the hot path - every request hostname goes through here.
//! A matcher whose filter failed to load is *unavailable*: it answers
//! "not a tracker" for everything instead of failing the request.

use crate::bloom::{decode, BloomFilter};
use crate::domain::registered_domain;
use crate::heuristics::is_suspicious_subdomain;

/// Read-only tracker lookup over a frozen filter.
#[derive(Debug, Clone, Default)]
pub struct TrackerMatcher {
    filter: Option<BloomFilter>,
}

impl TrackerMatcher {
    /// Wrap an already built filter.
    pub fn new(filter: BloomFilter) -> Self {
        Self {
            filter: Some(filter),
        }
    }

    /// A matcher with no filter. Every lookup returns `false`.
    pub fn unavailable() -> Self {
        Self { filter: None }
    }

    /// Load a matcher from filter bytes.
    ///
    /// Malformed data yields an unavailable matcher rather than an error.
    pub fn load(data: &[u8]) -> Self {
        match decode(data) {
            Ok(filter) => {
                log::info!(
                    "tracker filter loaded: {} bits, k={}",
                    filter.size_bits(),
                    filter.num_hashes()
                );
                Self::new(filter)
            }
            Err(e) => {
                log::warn!("tracker filter unavailable, lookups disabled: {e}");
                Self::unavailable()
            }
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filter(&self) -> Option<&BloomFilter> {
        self.filter.as_ref()
    }

    /// Whether `domain` is (probably) a known tracker.
    #[inline]
    pub fn is_tracker(&self, domain: &str) -> bool {
        match &self.filter {
            Some(filter) => filter.contains(domain),
            None => false,
        }
    }

    /// Whether `host` is worth resolving for [`uncloak`](Self::uncloak).
    ///
    /// Always `false` without a filter, since nothing could match.
    pub fn should_uncloak(&self, host: &str, page_host: Option<&str>) -> bool {
        self.is_available() && is_suspicious_subdomain(host, page_host)
    }

    /// Check a CNAME chain for a cloaked tracker.
    ///
    /// Each target is tested as-is and by its registered domain; the first
    /// matching target is returned.
    pub fn uncloak<'c, S: AsRef<str>>(&self, chain: &'c [S]) -> Option<&'c str> {
        if !self.is_available() {
            return None;
        }
        chain.iter().map(|s| s.as_ref()).find(|cname| {
            self.is_tracker(cname) || self.is_tracker(registered_domain(cname))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bloom::encode;

    fn matcher() -> TrackerMatcher {
        let mut filter = BloomFilter::with_capacity(4, 0.001).unwrap();
        for d in ["doubleclick.net", "omtrdc.net", "eulerian.net", "hotjar.com"] {
            filter.add(d);
        }
        TrackerMatcher::load(&encode(&filter))
    }

    #[test]
    fn test_loaded_matcher() {
        let m = matcher();
        assert!(m.is_available());
        assert!(m.is_tracker("doubleclick.net"));
        assert!(m.is_tracker("HOTJAR.com"));
        assert!(!m.is_tracker("example.org"));
    }

    #[test]
    fn test_malformed_data_fails_safe() {
        let m = TrackerMatcher::load(&[0xff, 0xff]);
        assert!(!m.is_available());
        assert!(!m.is_tracker("doubleclick.net"));
        assert_eq!(m.uncloak(&["metrics.site.com", "site.com.omtrdc.net"]), None);
    }

    #[test]
    fn test_uncloak_by_registered_domain() {
        let m = matcher();
        let chain = ["metrics.shop.example", "shop.example.sc.omtrdc.net"];
        assert_eq!(m.uncloak(&chain), Some("shop.example.sc.omtrdc.net"));
    }

    #[test]
    fn test_uncloak_clean_chain() {
        let m = matcher();
        let chain = vec!["cdn.example.org".to_string(), "edge.example.org".to_string()];
        assert_eq!(m.uncloak(&chain), None);
    }

    #[test]
    fn test_should_uncloak() {
        let m = matcher();
        assert!(m.should_uncloak("metrics.shop.example", None));
        assert!(m.should_uncloak("cdn.partner.net", Some("www.shop.example")));
        assert!(!m.should_uncloak("www.shop.example", Some("shop.example")));
        assert!(!TrackerMatcher::unavailable().should_uncloak("metrics.shop.example", None));
    }

    #[test]
    fn test_matcher_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<TrackerMatcher>();
    }
}
