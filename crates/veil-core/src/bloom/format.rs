//! Tracker Filter Format Constants
//!
//! All values are little-endian.
//!
//! ```text
//! offset 0..4  size_bits   u32
//! offset 4..8  num_hashes  u32
//! offset 8..   bit array, ceil(size_bits / 8) bytes
//! ```
//!
//! Bit `i` lives in byte `i / 8` under mask `1 << (i % 8)` (LSB first).

/// Header size in bytes
pub const HEADER_SIZE: usize = 8;

/// Header field byte offsets.
pub mod header {
    /// u32 size_bits
    pub const SIZE_BITS: usize = 0;
    /// u32 num_hashes
    pub const NUM_HASHES: usize = 4;
}

/// Number of bytes needed to hold `size_bits` bits.
#[inline]
pub const fn bit_array_len(size_bits: u32) -> usize {
    (size_bits as usize).div_ceil(8)
}

/// Read u32 little-endian.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

/// Write u32 little-endian.
#[inline]
pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_array_len() {
        assert_eq!(bit_array_len(1), 1);
        assert_eq!(bit_array_len(8), 1);
        assert_eq!(bit_array_len(9), 2);
        assert_eq!(bit_array_len(29), 4);
    }

    #[test]
    fn test_u32_le_round_trip() {
        let mut buf = [0u8; 8];
        write_u32_le(&mut buf, 4, 0x0a0b0c0d);
        assert_eq!(&buf[4..], &[0x0d, 0x0c, 0x0b, 0x0a]);
        assert_eq!(read_u32_le(&buf, 4), 0x0a0b0c0d);
    }
}
