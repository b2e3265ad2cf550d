//! Error type for filter compilation and rule synthesis.

use veil_core::FilterError;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("{missing} domain(s) missing from freshly built filter (e.g. {sample:?})")]
    BuildIntegrity { missing: usize, sample: Vec<String> },
    #[error("MurmurHash3 self-check failed for seed {seed}: expected {expected:#010x}, got {actual:#010x}")]
    HashMismatch { seed: u32, expected: u32, actual: u32 },
    #[error("Unknown rule dialect: {0:?} (expected chrome or firefox)")]
    UnknownDialect(String),
    #[error("Confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f64),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
