//! Filter encoding and decoding.

use crate::error::FilterError;

use super::filter::BloomFilter;
use super::format::*;

/// Serialize a filter to its wire format.
pub fn encode(filter: &BloomFilter) -> Vec<u8> {
    let bits = filter.bits();
    let mut buffer = vec![0u8; HEADER_SIZE + bits.len()];
    write_u32_le(&mut buffer, header::SIZE_BITS, filter.size_bits());
    write_u32_le(&mut buffer, header::NUM_HASHES, filter.num_hashes());
    buffer[HEADER_SIZE..].copy_from_slice(bits);
    buffer
}

/// Load a filter from its wire format.
///
/// Bytes past the end of the bit array are ignored.
pub fn decode(data: &[u8]) -> Result<BloomFilter, FilterError> {
    if data.len() < HEADER_SIZE {
        return Err(FilterError::Format(format!(
            "buffer of {} bytes is shorter than the {HEADER_SIZE}-byte header",
            data.len()
        )));
    }

    let size_bits = read_u32_le(data, header::SIZE_BITS);
    let num_hashes = read_u32_le(data, header::NUM_HASHES);
    if size_bits == 0 {
        return Err(FilterError::Format("size_bits is zero".to_string()));
    }
    if num_hashes == 0 {
        return Err(FilterError::Format("num_hashes is zero".to_string()));
    }

    let bit_len = bit_array_len(size_bits);
    let body = &data[HEADER_SIZE..];
    if body.len() < bit_len {
        return Err(FilterError::Format(format!(
            "bit array truncated: need {bit_len} bytes for {size_bits} bits, got {}",
            body.len()
        )));
    }

    Ok(BloomFilter::from_parts(
        size_bits,
        num_hashes,
        body[..bit_len].to_vec(),
    ))
}
