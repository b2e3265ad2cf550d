//! Request feature vector for the tracker detection model.
//!
//! The model is trained elsewhere; this module only fixes the layout of its
//! input so the extension and the training pipeline agree on it.

use serde::Deserialize;

use crate::domain::extract_host;
use crate::types::ResourceTypes;

/// Length of the feature vector. Unused trailing slots are zero.
pub const FEATURE_DIM: usize = 50;

/// Request as described by the extension. Missing fields default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestDescriptor {
    pub url: String,
    pub domain: String,
    #[serde(rename = "type")]
    pub request_type: String,
    pub has_cookies: u32,
    pub cookie_count: u32,
    pub has_referer: u32,
    pub has_user_agent: u32,
}

/// Build the fixed-layout feature vector.
///
/// | slot | feature |
/// |---|---|
/// | 0 | url length |
/// | 1..=4 | count of `.` `/` `?` `&` in url |
/// | 5..=7 | url contains `track` / `analytics` / `pixel` |
/// | 8, 9 | domain length, domain dot count |
/// | 10 | request type code |
/// | 11..=14 | has_cookies, cookie_count, has_referer, has_user_agent |
///
/// When `domain` is empty it is taken from the url host.
pub fn extract_features(request: &RequestDescriptor) -> [f32; FEATURE_DIM] {
    let mut features = [0f32; FEATURE_DIM];
    let url = request.url.as_str();
    let url_lower = url.to_lowercase();
    let domain = if request.domain.is_empty() {
        extract_host(url).unwrap_or("")
    } else {
        request.domain.as_str()
    };

    let count = |s: &str, c: char| s.matches(c).count() as f32;
    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    features[0] = url.chars().count() as f32;
    features[1] = count(url, '.');
    features[2] = count(url, '/');
    features[3] = count(url, '?');
    features[4] = count(url, '&');
    features[5] = flag(url_lower.contains("track"));
    features[6] = flag(url_lower.contains("analytics"));
    features[7] = flag(url_lower.contains("pixel"));
    features[8] = domain.chars().count() as f32;
    features[9] = count(domain, '.');
    features[10] = ResourceTypes::from_type_name(&request.request_type).feature_code() as f32;
    features[11] = request.has_cookies as f32;
    features[12] = request.cookie_count as f32;
    features[13] = request.has_referer as f32;
    features[14] = request.has_user_agent as f32;

    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_request() {
        let request = RequestDescriptor {
            url: "https://doubleclick.net/track?id=123".to_string(),
            domain: "doubleclick.net".to_string(),
            request_type: "script".to_string(),
            has_cookies: 1,
            cookie_count: 3,
            has_referer: 1,
            has_user_agent: 1,
        };
        let f = extract_features(&request);
        assert_eq!(f.len(), 50);
        assert_eq!(f[0], 36.0);
        assert_eq!(f[1], 1.0);
        assert_eq!(f[2], 3.0);
        assert_eq!(f[3], 1.0);
        assert_eq!(f[4], 0.0);
        assert_eq!(f[5], 1.0);
        assert_eq!(f[6], 0.0);
        assert_eq!(f[8], 15.0);
        assert_eq!(f[9], 1.0);
        assert_eq!(f[10], 1.0);
        assert_eq!(f[11..15], [1.0f32, 3.0, 1.0, 1.0]);
        assert!(f[15..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_tracking_keywords() {
        let request = RequestDescriptor {
            url: "https://Analytics.google.com/Track".to_string(),
            ..Default::default()
        };
        let f = extract_features(&request);
        assert_eq!(f[5], 1.0);
        assert_eq!(f[6], 1.0);
        // domain falls back to the url host
        assert_eq!(f[8], "Analytics.google.com".len() as f32);
    }

    #[test]
    fn test_missing_data() {
        let request: RequestDescriptor = serde_json::from_str("{}").unwrap();
        let f = extract_features(&request);
        assert!(f.iter().all(|v| v.is_finite() && *v == 0.0));
    }
}
