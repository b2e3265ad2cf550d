//! Hash functions for Veil
//!
//! MurmurHash3 x86 32-bit, run twice with fixed seeds to derive Bloom filter
//! bit positions by double hashing:
//!
//! ```text
//! position_i = (h1 + i * h2) mod 2^32 mod size_bits
//! h1 = murmur3_32(key, SEED_PRIMARY)
//! h2 = murmur3_32(key, SEED_SECONDARY)
//! ```
//!
//! # Compatibility
//!
//! Every filter ever shipped depends on this exact output. Any change here
//! silently breaks lookups against existing filter files, so the function is
//! pinned by [`REFERENCE_VECTORS`] and checked by [`verify_reference_vectors`]
//! before a filter is written.

/// Seed for the first hash pass (`h1`).
pub const SEED_PRIMARY: u32 = 0;

/// Seed for the second hash pass (`h2`). 2020-01-01T00:00:00Z as a Unix timestamp.
pub const SEED_SECONDARY: u32 = 1_577_836_800;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// Murmur3 32-bit hash implementation.
/// Optimized for short strings (typical domain lengths).
#[inline]
pub fn murmur3_32(data: &[u8], seed: u32) -> u32 {
    let len = data.len();
    let mut h = seed;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= mix_k(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = blocks.remainder();
    let mut k: u32 = 0;
    if tail.len() >= 3 {
        k ^= (tail[2] as u32) << 16;
    }
    if tail.len() >= 2 {
        k ^= (tail[1] as u32) << 8;
    }
    if !tail.is_empty() {
        k ^= tail[0] as u32;
        h ^= mix_k(k);
    }

    // Finalization
    h ^= len as u32;
    fmix32(h)
}

#[inline(always)]
fn mix_k(k: u32) -> u32 {
    k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

#[inline(always)]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// The base hash pair `(h1, h2)` for a filter key.
#[inline]
pub fn hash_pair(key: &str) -> (u32, u32) {
    let bytes = key.as_bytes();
    (murmur3_32(bytes, SEED_PRIMARY), murmur3_32(bytes, SEED_SECONDARY))
}

/// Iterator over the `num_hashes` bit positions of a key.
///
/// Does not allocate; the filter walks it once per add or query.
#[derive(Debug, Clone)]
pub struct BitPositions {
    h1: u32,
    h2: u32,
    size_bits: u32,
    i: u32,
    num_hashes: u32,
}

impl Iterator for BitPositions {
    type Item = u32;

    #[inline]
    fn next(&mut self) -> Option<u32> {
        if self.i >= self.num_hashes {
            return None;
        }
        let combined = self.h1.wrapping_add(self.i.wrapping_mul(self.h2));
        self.i += 1;
        Some(combined % self.size_bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = (self.num_hashes - self.i) as usize;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for BitPositions {}

/// Derive the bit positions of an already-normalized key.
///
/// `size_bits` must be non-zero.
#[inline]
pub fn bit_positions(key: &str, size_bits: u32, num_hashes: u32) -> BitPositions {
    debug_assert!(size_bits > 0);
    let (h1, h2) = hash_pair(key);
    BitPositions {
        h1,
        h2,
        size_bits,
        i: 0,
        num_hashes,
    }
}

/// Published test vectors: `(input, seed, expected)`.
///
/// The first block is the standard MurmurHash3 x86_32 vector set; the last
/// two pin the filter seeds on a real tracker domain.
pub const REFERENCE_VECTORS: &[(&[u8], u32, u32)] = &[
    (b"", 0, 0x00000000),
    (b"", 1, 0x514e28b7),
    (b"", 0xffffffff, 0x81f16f39),
    (b"\0\0\0\0", 0, 0x2362f9de),
    (b"a", 0x9747b28c, 0x7fa09ea6),
    (b"abc", 0, 0xb3dd93fa),
    (b"aaaa", 0x9747b28c, 0x5a97808a),
    (b"Hello, world!", 0x9747b28c, 0x24884cba),
    (
        b"The quick brown fox jumps over the lazy dog",
        0x9747b28c,
        0x2fa826cd,
    ),
    (b"doubleclick.net", SEED_PRIMARY, 0xb46e0c2f),
    (b"doubleclick.net", SEED_SECONDARY, 0x7765c4ec),
];

/// A reference vector the local hash disagrees with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorMismatch {
    pub input: Vec<u8>,
    pub seed: u32,
    pub expected: u32,
    pub actual: u32,
}

/// Check [`murmur3_32`] against [`REFERENCE_VECTORS`].
pub fn verify_reference_vectors() -> Result<(), VectorMismatch> {
    for &(input, seed, expected) in REFERENCE_VECTORS {
        let actual = murmur3_32(input, seed);
        if actual != expected {
            return Err(VectorMismatch {
                input: input.to_vec(),
                seed,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(verify_reference_vectors(), Ok(()));
    }

    #[test]
    fn test_doubleclick_filter_seeds() {
        assert_eq!(murmur3_32(b"doubleclick.net", 0), 0xb46e0c2f);
        assert_eq!(murmur3_32(b"doubleclick.net", 1577836800), 0x7765c4ec);
        assert_eq!(murmur3_32(b"google-analytics.com", 0), 0xf17245ea);
    }

    #[test]
    fn test_murmur3_consistent() {
        let h1 = murmur3_32(b"example.com", 0);
        let h2 = murmur3_32(b"example.com", 0);
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_murmur3_different_seeds() {
        let h1 = murmur3_32(b"example.com", SEED_PRIMARY);
        let h2 = murmur3_32(b"example.com", SEED_SECONDARY);
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_murmur3_multibyte_utf8() {
        // "é" is hashed as its two UTF-8 bytes, not as a single code unit.
        assert_eq!("é".len(), 2);
        assert_eq!(murmur3_32("é".as_bytes(), 0), 0x10110787);
    }

    #[test]
    fn test_murmur3_every_tail_length() {
        let mut seen = std::collections::HashSet::new();
        for len in 0..=8 {
            let s = vec![b'x'; len];
            assert!(seen.insert(murmur3_32(&s, 0)), "collision at len {len}");
        }
    }

    #[test]
    fn test_bit_positions_double_hashing() {
        let (h1, h2) = hash_pair("doubleclick.net");
        let positions: Vec<u32> = bit_positions("doubleclick.net", 29, 10).collect();
        assert_eq!(positions.len(), 10);
        for (i, pos) in positions.iter().enumerate() {
            let expected = h1.wrapping_add((i as u32).wrapping_mul(h2)) % 29;
            assert_eq!(*pos, expected);
            assert!(*pos < 29);
        }
    }

    #[test]
    fn test_bit_positions_exact_size() {
        let positions = bit_positions("a.b", 100, 7);
        assert_eq!(positions.len(), 7);
    }
}
