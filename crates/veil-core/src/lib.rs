//! Veil Core Library
//!
//! This crate provides the tracker-domain filter engine shared by the offline
//! builder and the browser-side matcher, plus the cookie classifier used by
//! the extension UI and the rule generator.
//!
//! # Architecture
//!
//! Tracker domains are folded into a Bloom filter whose bit positions come
//! from two MurmurHash3 passes with fixed seeds. The builder and the matcher
//! must derive identical positions from identical keys, so the hash is a
//! versioned contract checked against a published vector table. The filter
//! travels between the two as a small little-endian blob.
//!
//! # Modules
//!
//! - `hash`: MurmurHash3 32-bit and double-hash bit positions
//! - `domain`: Domain normalization and registered-domain extraction
//! - `params`: Filter size / hash count derivation from a target FP rate
//! - `bloom`: Bloom filter engine and its binary wire format
//! - `matcher`: Fail-safe lookup layer used at request time
//! - `heuristics`: CNAME-cloaking candidates and DGA subdomain detection
//! - `classify`: Cookie category classification and risk scoring
//! - `features`: Request feature vector for the tracker model
//! - `types`: Shared type definitions

pub mod bloom;
pub mod classify;
pub mod domain;
pub mod error;
pub mod features;
pub mod hash;
pub mod heuristics;
pub mod matcher;
pub mod params;
pub mod types;

// Re-export commonly used types
pub use bloom::{decode, encode, BloomFilter};
pub use classify::{CookieClassifier, CookieDescriptor, RawCookie};
pub use domain::{normalize_domain, registered_domain, Domain};
pub use error::{FilterError, ValidationError};
pub use hash::{murmur3_32, SEED_PRIMARY, SEED_SECONDARY};
pub use heuristics::{detect_dga, is_suspicious_subdomain, DgaOptions, DgaVerdict};
pub use matcher::TrackerMatcher;
pub use params::{optimal_params, FilterParams};
pub use types::{CookieCategory, ResourceTypes};
