//! Error types for the filter engine and the classifier boundary.

/// Error type for filter construction and decoding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Malformed filter data: {0}")]
    Format(String),
}

/// Error type for descriptors arriving from outside the crate.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[error("No cookies provided")]
    EmptyBatch,
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
