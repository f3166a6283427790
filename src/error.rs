//! Error types for the forensics engine.
//!
//! Data-quality problems in booking records are not errors: those records
//! are excluded and logged. Only unusable inputs and configuration surface
//! here.

use thiserror::Error;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, ForensicsError>;

#[derive(Debug, Error)]
pub enum ForensicsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown primary use category: {0:?}")]
    UnknownPrimaryUse(String),

    #[error("invalid usage rule for {use_label}: {reason}")]
    InvalidUsageRule { use_label: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}
