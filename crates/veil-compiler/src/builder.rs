use veil_core::hash::verify_reference_vectors;
use veil_core::params::{expected_fp_rate, optimal_params, DEFAULT_FP_RATE, DEFAULT_NUM_HASHES};
use veil_core::{encode, BloomFilter, Domain, FilterError, FilterParams};

use crate::error::CompileError;
use crate::optimizer::dedupe_domains;

/// Number of synthetic non-tracker probes used to estimate the FP rate.
pub const DEFAULT_FP_PROBES: usize = 10_000;

/// Filter build configuration.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Target false positive rate, used when `size_bits` is not given.
    pub fp_rate: f64,
    /// Explicit filter size. Overrides the size derived from `fp_rate`.
    pub size_bits: Option<u32>,
    /// Explicit hash count. Defaults to 7 with an explicit size, otherwise derived.
    pub num_hashes: Option<u32>,
    /// Probes for the observed FP estimate; 0 skips it.
    pub fp_probes: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            fp_rate: DEFAULT_FP_RATE,
            size_bits: None,
            num_hashes: None,
            fp_probes: DEFAULT_FP_PROBES,
        }
    }
}

/// Summary of a build, for logging and the CLI.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub input_domains: usize,
    pub unique_domains: usize,
    pub size_bits: u32,
    pub num_hashes: u32,
    pub encoded_bytes: usize,
    pub fill_ratio: f64,
    pub expected_fp_rate: f64,
    pub observed_fp_rate: Option<f64>,
}

#[derive(Debug)]
pub struct BuiltFilter {
    pub filter: BloomFilter,
    pub report: BuildReport,
}

impl BuiltFilter {
    pub fn to_bytes(&self) -> Vec<u8> {
        encode(&self.filter)
    }
}

/// Build and verify a tracker filter from a corpus.
///
/// The corpus is deduplicated first. Nothing is returned unless every corpus
/// domain queries true against the finished filter.
pub fn build_filter(mut domains: Vec<Domain>, options: &BuildOptions) -> Result<BuiltFilter, CompileError> {
    verify_reference_vectors().map_err(|m| CompileError::HashMismatch {
        seed: m.seed,
        expected: m.expected,
        actual: m.actual,
    })?;

    let stats = dedupe_domains(&mut domains);
    if stats.deduped > 0 {
        log::debug!("removed {} duplicate domain(s)", stats.deduped);
    }

    let params = resolve_params(domains.len(), options)?;
    log::info!(
        "building filter for {} domains: {} bits ({} bytes), k={}",
        domains.len(),
        params.size_bits,
        params.size_bits.div_ceil(8),
        params.num_hashes
    );

    let mut filter = BloomFilter::new(params.size_bits, params.num_hashes)?;
    for domain in &domains {
        filter.add(domain.as_str());
    }

    verify_filter(&filter, &domains)?;

    let observed_fp_rate = (options.fp_probes > 0).then(|| estimate_fp_rate(&filter, options.fp_probes));
    if let Some(rate) = observed_fp_rate {
        log::info!("estimated false positive rate: {rate:.4} (target: {})", options.fp_rate);
    }

    let report = BuildReport {
        input_domains: stats.before,
        unique_domains: stats.after,
        size_bits: filter.size_bits(),
        num_hashes: filter.num_hashes(),
        encoded_bytes: veil_core::bloom::HEADER_SIZE + filter.bits().len(),
        fill_ratio: filter.fill_ratio(),
        expected_fp_rate: expected_fp_rate(filter.size_bits(), domains.len(), filter.num_hashes()),
        observed_fp_rate,
    };

    Ok(BuiltFilter { filter, report })
}

fn resolve_params(n: usize, options: &BuildOptions) -> Result<FilterParams, FilterError> {
    if n == 0 {
        return Err(FilterError::InvalidParameter(
            "tracker corpus is empty".to_string(),
        ));
    }
    match options.size_bits {
        Some(size_bits) => Ok(FilterParams {
            size_bits,
            num_hashes: options.num_hashes.unwrap_or(DEFAULT_NUM_HASHES),
        }),
        None => {
            let mut params = optimal_params(n, options.fp_rate)?;
            if let Some(k) = options.num_hashes {
                params.num_hashes = k;
            }
            Ok(params)
        }
    }
}

/// Check that every domain queries true. A miss means a hash or indexing bug.
pub fn verify_filter(filter: &BloomFilter, domains: &[Domain]) -> Result<(), CompileError> {
    let missing: Vec<&Domain> = domains.iter().filter(|d| !filter.contains(d.as_str())).collect();
    if missing.is_empty() {
        return Ok(());
    }
    for domain in missing.iter().take(5) {
        log::error!("missing from filter: {domain}");
    }
    Err(CompileError::BuildIntegrity {
        missing: missing.len(),
        sample: missing.iter().take(5).map(|d| d.to_string()).collect(),
    })
}

/// Observed FP rate over synthetic domains that cannot be in a real corpus.
pub fn estimate_fp_rate(filter: &BloomFilter, probes: usize) -> f64 {
    if probes == 0 {
        return 0.0;
    }
    let hits = (0..probes)
        .filter(|i| filter.contains(&format!("test{i}random{}.example{i}.com", i * 7)))
        .count();
    hits as f64 / probes as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_domains;

    fn domains(list: &[&str]) -> Vec<Domain> {
        list.iter().filter_map(|d| Domain::parse(d)).collect()
    }

    #[test]
    fn builds_two_domain_scenario() {
        let built = build_filter(domains(&["doubleclick.net", "google-analytics.com"]), &BuildOptions::default()).unwrap();
        assert_eq!(built.report.size_bits, 29);
        assert_eq!(built.report.num_hashes, 10);
        assert!(built.filter.contains("doubleclick.net"));
        assert!(!built.filter.contains("example.org"));
        assert_eq!(built.to_bytes(), vec![0x1d, 0, 0, 0, 0x0a, 0, 0, 0, 0xe6, 0xb5, 0x4c, 0x0b]);
        assert_eq!(built.report.encoded_bytes, 12);
    }

    #[test]
    fn empty_corpus_is_fatal() {
        let err = build_filter(Vec::new(), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::Filter(FilterError::InvalidParameter(_))));
    }

    #[test]
    fn duplicates_do_not_inflate_size() {
        let built = build_filter(
            domains(&["doubleclick.net", "DoubleClick.net", "google-analytics.com"]),
            &BuildOptions::default(),
        )
        .unwrap();
        assert_eq!(built.report.input_domains, 3);
        assert_eq!(built.report.unique_domains, 2);
        assert_eq!(built.report.size_bits, 29);
    }

    #[test]
    fn explicit_size_defaults_to_seven_hashes() {
        let options = BuildOptions {
            size_bits: Some(4096),
            ..Default::default()
        };
        let built = build_filter(domains(&["hotjar.com"]), &options).unwrap();
        assert_eq!(built.report.size_bits, 4096);
        assert_eq!(built.report.num_hashes, 7);
    }

    #[test]
    fn builtin_corpus_fp_rate_near_target() {
        let built = build_filter(builtin_domains(), &BuildOptions::default()).unwrap();
        let observed = built.report.observed_fp_rate.unwrap();
        assert!(observed <= 0.005, "observed fp rate {observed}");
    }

    #[test]
    fn verify_reports_missing_domains() {
        let filter = BloomFilter::new(1024, 3).unwrap();
        let err = verify_filter(&filter, &domains(&["a.com", "b.com"])).unwrap_err();
        match err {
            CompileError::BuildIntegrity { missing, sample } => {
                assert_eq!(missing, 2);
                assert_eq!(sample, vec!["a.com", "b.com"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_probes_skip_estimate() {
        let options = BuildOptions {
            fp_probes: 0,
            ..Default::default()
        };
        let built = build_filter(domains(&["hotjar.com"]), &options).unwrap();
        assert!(built.report.observed_fp_rate.is_none());
    }
}
