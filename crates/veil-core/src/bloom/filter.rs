//! Bloom filter over normalized tracker domains.
//!
//! False positives are possible, false negatives are not. Bits are only ever
//! set; there is no removal. A loaded filter is treated as frozen: lookups
//! take `&self`, and a rebuild replaces the whole value.

use bitvec::prelude::*;

use crate::domain::normalize_domain;
use crate::error::FilterError;
use crate::hash::{bit_positions, BitPositions};
use crate::params::{optimal_params, FilterParams, DEFAULT_NUM_HASHES};

use super::format::bit_array_len;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    size_bits: u32,
    num_hashes: u32,
    bits: BitVec<u8, Lsb0>,
}

impl BloomFilter {
    /// Create an empty filter of `size_bits` bits and `num_hashes` hash functions.
    pub fn new(size_bits: u32, num_hashes: u32) -> Result<Self, FilterError> {
        if size_bits == 0 {
            return Err(FilterError::InvalidParameter(
                "size_bits must be at least 1".to_string(),
            ));
        }
        if num_hashes == 0 {
            return Err(FilterError::InvalidParameter(
                "num_hashes must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            size_bits,
            num_hashes,
            bits: bitvec![u8, Lsb0; 0; size_bits as usize],
        })
    }

    /// Create an empty filter with the default hash count.
    pub fn with_size(size_bits: u32) -> Result<Self, FilterError> {
        Self::new(size_bits, DEFAULT_NUM_HASHES)
    }

    /// Create an empty filter sized for `n` items at `fp_rate`.
    pub fn with_capacity(n: usize, fp_rate: f64) -> Result<Self, FilterError> {
        let FilterParams {
            size_bits,
            num_hashes,
        } = optimal_params(n, fp_rate)?;
        Self::new(size_bits, num_hashes)
    }

    /// Rebuild a filter from raw parts. Used by the codec.
    ///
    /// Padding bits past `size_bits` in the last byte are cleared.
    pub(crate) fn from_parts(size_bits: u32, num_hashes: u32, raw: Vec<u8>) -> Self {
        debug_assert_eq!(raw.len(), bit_array_len(size_bits));
        let mut bits = BitVec::<u8, Lsb0>::from_vec(raw);
        bits.truncate(size_bits as usize);
        bits.set_uninitialized(false);
        Self {
            size_bits,
            num_hashes,
            bits,
        }
    }

    #[inline]
    pub fn size_bits(&self) -> u32 {
        self.size_bits
    }

    #[inline]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Raw bit array, `ceil(size_bits / 8)` bytes.
    #[inline]
    pub fn bits(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    /// Add a domain. Adding the same domain twice changes nothing.
    pub fn add(&mut self, domain: &str) {
        let key = normalize_domain(domain);
        for pos in bit_positions(&key, self.size_bits, self.num_hashes) {
            self.bits.set(pos as usize, true);
        }
    }

    /// Check whether a domain may be in the filter.
    ///
    /// `false` means definitely absent; `true` means possibly present.
    pub fn contains(&self, domain: &str) -> bool {
        let key = normalize_domain(domain);
        self.positions(&key).all(|pos| self.bits[pos as usize])
    }

    #[inline]
    fn positions(&self, key: &str) -> BitPositions {
        bit_positions(key, self.size_bits, self.num_hashes)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.bits.count_ones() as u64
    }

    /// Fraction of bits set, in [0, 1].
    pub fn fill_ratio(&self) -> f64 {
        self.count_ones() as f64 / self.size_bits as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(BloomFilter::new(0, 3).is_err());
        assert!(BloomFilter::new(64, 0).is_err());
    }

    #[test]
    fn test_bit_array_length_rounds_up() {
        let filter = BloomFilter::new(29, 10).unwrap();
        assert_eq!(filter.bits().len(), 4);
        assert_eq!(filter.count_ones(), 0);
    }

    #[test]
    fn test_with_size_uses_default_hash_count() {
        let filter = BloomFilter::with_size(1024).unwrap();
        assert_eq!(filter.num_hashes(), 7);
    }

    #[test]
    fn test_two_domain_scenario() {
        let mut filter = BloomFilter::with_capacity(2, 0.001).unwrap();
        assert_eq!(filter.size_bits(), 29);
        assert_eq!(filter.num_hashes(), 10);

        filter.add("doubleclick.net");
        filter.add("google-analytics.com");

        assert!(filter.contains("doubleclick.net"));
        assert!(filter.contains("google-analytics.com"));
        assert!(!filter.contains("example.org"));
        assert_eq!(filter.bits(), &[0xe6, 0xb5, 0x4c, 0x0b]);
    }

    #[test]
    fn test_lookup_is_normalized() {
        let mut filter = BloomFilter::with_capacity(10, 0.001).unwrap();
        filter.add(".Tracker.Example.NET");
        assert!(filter.contains("tracker.example.net"));
        assert!(filter.contains("TRACKER.example.net"));
        assert!(filter.contains(".tracker.example.net"));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut filter = BloomFilter::with_capacity(10, 0.01).unwrap();
        filter.add("hotjar.com");
        let once = filter.clone();
        filter.add("hotjar.com");
        assert_eq!(filter, once);
    }

    #[test]
    fn test_no_false_negatives() {
        let domains: Vec<String> = (0..500).map(|i| format!("tracker{i}.ads{}.net", i % 13)).collect();
        let mut filter = BloomFilter::with_capacity(domains.len(), 0.001).unwrap();
        for d in &domains {
            filter.add(d);
        }
        for d in &domains {
            assert!(filter.contains(d), "{d} missing");
        }
    }

    #[test]
    fn test_empty_key() {
        let mut filter = BloomFilter::new(64, 3).unwrap();
        assert!(!filter.contains(""));
        filter.add("");
        assert!(filter.contains(""));
    }

    #[test]
    fn test_from_parts_clears_padding() {
        let filter = BloomFilter::from_parts(12, 3, vec![0x01, 0xff]);
        assert_eq!(filter.bits(), &[0x01, 0x0f]);
        assert_eq!(filter.count_ones(), 5);
    }

    #[test]
    fn test_bits_are_lsb_first() {
        let mut filter = BloomFilter::new(16, 1).unwrap();
        filter.bits.set(0, true);
        filter.bits.set(10, true);
        assert_eq!(filter.bits(), &[0b0000_0001, 0b0000_0100]);
    }

    #[test]
    fn test_fill_ratio() {
        let mut filter = BloomFilter::new(16, 1).unwrap();
        assert_eq!(filter.fill_ratio(), 0.0);
        filter.add("a.com");
        assert!((filter.fill_ratio() - 1.0 / 16.0).abs() < f64::EPSILON);
    }
}
