use veil_compiler::builtin::builtin_domains;
use veil_compiler::{
    build_filter, export_rules, parse_domain_list, BuildOptions, Dialect, PatternModelBuilder,
};
use veil_core::TrackerMatcher;

#[test]
fn corpus_to_matcher_round_trip() {
    let corpus = "\
# trackers
doubleclick.net
||omtrdc.net^
0.0.0.0 eulerian.net
hotjar.com/static
doubleclick.net
";
    let domains = parse_domain_list(corpus);
    assert_eq!(domains.len(), 5);

    let built = build_filter(domains, &BuildOptions::default()).unwrap();
    assert_eq!(built.report.unique_domains, 4);

    let matcher = TrackerMatcher::load(&built.to_bytes());
    assert!(matcher.is_available());
    for domain in ["doubleclick.net", "omtrdc.net", "eulerian.net", "hotjar.com"] {
        assert!(matcher.is_tracker(domain), "{domain} should match");
    }
    assert!(matcher.is_tracker(".DoubleClick.NET"));
    assert!(!matcher.is_tracker("example.org"));

    let chain = ["cdn.shop.example", "shop.eulerian.net"];
    assert_eq!(matcher.uncloak(&chain), Some("shop.eulerian.net"));
}

#[test]
fn builtin_corpus_builds_and_loads() {
    let built = build_filter(builtin_domains(), &BuildOptions::default()).unwrap();
    assert_eq!(built.report.size_bits, 1884);
    assert_eq!(built.report.num_hashes, 10);

    let matcher = TrackerMatcher::load(&built.to_bytes());
    for domain in builtin_domains() {
        assert!(matcher.is_tracker(domain.as_str()));
    }
}

#[test]
fn truncated_filter_disables_matching() {
    let built = build_filter(builtin_domains(), &BuildOptions::default()).unwrap();
    let bytes = built.to_bytes();
    let matcher = TrackerMatcher::load(&bytes[..bytes.len() - 1]);
    assert!(!matcher.is_available());
    assert!(!matcher.is_tracker("doubleclick.net"));
}

#[test]
fn model_to_rules() {
    let mut builder = PatternModelBuilder::default();
    builder
        .load_known_trackers(r#"{"domains": ["doubleclick.net", "hotjar.com"]}"#)
        .unwrap();
    builder
        .load_suspicious_patterns(
            r#"[
                {"pattern": "tracker.example.com", "confidence": 0.95},
                {"pattern": "ad-server.net", "confidence": 0.87},
                {"pattern": "cdn.example.org", "confidence": 0.5}
            ]"#,
        )
        .unwrap();
    let model = builder.build();

    let chrome: serde_json::Value =
        serde_json::from_str(&export_rules(&model, Dialect::Primary, 100).unwrap()).unwrap();
    let rules = chrome.as_array().unwrap();
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[0]["condition"]["urlFilter"], "*://doubleclick.net/*");
    assert_eq!(rules[2]["priority"], 3);
    assert_eq!(rules[3]["priority"], 2);

    let firefox: serde_json::Value =
        serde_json::from_str(&export_rules(&model, Dialect::Secondary, 3).unwrap()).unwrap();
    assert_eq!(firefox["patterns"].as_array().unwrap().len(), 3);
}
