//! Optimal Bloom filter parameter calculation
//!
//! - m = ceil(-n * ln(p) / (ln 2)^2)   -- filter size in bits
//! - k = max(1, round((m / n) * ln 2)) -- number of hash functions

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Target false positive rate used when none is configured.
pub const DEFAULT_FP_RATE: f64 = 0.001;

/// Hash function count used when the size is given without one.
pub const DEFAULT_NUM_HASHES: u32 = 7;

/// Derived filter dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub size_bits: u32,
    pub num_hashes: u32,
}

/// Calculate filter size and hash count for `n` items at target rate `fp_rate`.
///
/// An empty corpus has no meaningful filter, so `n == 0` is an error the
/// caller must special-case.
pub fn optimal_params(n: usize, fp_rate: f64) -> Result<FilterParams, FilterError> {
    if n == 0 {
        return Err(FilterError::InvalidParameter(
            "cannot size a filter for an empty corpus".to_string(),
        ));
    }
    if !fp_rate.is_finite() || fp_rate <= 0.0 || fp_rate >= 1.0 {
        return Err(FilterError::InvalidParameter(format!(
            "false positive rate must be in (0, 1), got {fp_rate}"
        )));
    }

    let n_f = n as f64;
    let size = (-(n_f * fp_rate.ln()) / (LN_2 * LN_2)).ceil();
    if size > u32::MAX as f64 {
        return Err(FilterError::InvalidParameter(format!(
            "filter of {size} bits exceeds the u32 wire format"
        )));
    }
    let size_bits = size as u32;
    let num_hashes = ((size_bits as f64 / n_f) * LN_2).round().max(1.0) as u32;

    log::debug!("filter params for n={n}, p={fp_rate}: m={size_bits} bits, k={num_hashes}");

    Ok(FilterParams {
        size_bits,
        num_hashes,
    })
}

/// Theoretical false positive rate: (1 - e^(-kn/m))^k.
pub fn expected_fp_rate(size_bits: u32, n: usize, num_hashes: u32) -> f64 {
    if size_bits == 0 {
        return 1.0;
    }
    let exponent = -(num_hashes as f64) * (n as f64) / (size_bits as f64);
    (1.0 - exponent.exp()).powi(num_hashes as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_domain_corpus() {
        let params = optimal_params(2, 0.001).unwrap();
        assert_eq!(
            params,
            FilterParams {
                size_bits: 29,
                num_hashes: 10
            }
        );
    }

    #[test]
    fn test_larger_corpus() {
        let params = optimal_params(1000, 0.01).unwrap();
        assert_eq!(params.size_bits, 9586);
        assert_eq!(params.num_hashes, 7);
    }

    #[test]
    fn test_empty_corpus_rejected() {
        assert!(matches!(
            optimal_params(0, 0.001),
            Err(FilterError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_fp_rate_out_of_range() {
        for rate in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            assert!(optimal_params(10, rate).is_err(), "rate {rate} accepted");
        }
    }

    #[test]
    fn test_high_fp_rate_keeps_one_hash() {
        let params = optimal_params(10, 0.9).unwrap();
        assert!(params.num_hashes >= 1);
        assert!(params.size_bits >= 1);
    }

    #[test]
    fn test_expected_fp_rate_near_target() {
        let params = optimal_params(500, 0.001).unwrap();
        let rate = expected_fp_rate(params.size_bits, 500, params.num_hashes);
        assert!(rate <= 0.0011, "rate {rate}");
    }
}
