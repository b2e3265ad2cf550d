//! Bloom filter engine and its binary wire format

pub mod codec;
pub mod filter;
pub mod format;

pub use codec::{decode, encode};
pub use filter::BloomFilter;
pub use format::*;
