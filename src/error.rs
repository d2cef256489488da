use thiserror::Error;

/// Main error type for pliant operations
#[derive(Error, Debug)]
pub enum PliantError {
    #[error("Invalid match input: {0}")]
    InvalidPrimary(String),

    #[error("Invalid term value for field '{field}': {value}")]
    InvalidTermValue { field: String, value: String },

    #[error("Invalid flag '{key}': expected a boolean, got {value}")]
    InvalidFlag { key: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for pliant operations
pub type Result<T> = std::result::Result<T, PliantError>;
