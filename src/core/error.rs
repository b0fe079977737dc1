//! Error types for SVM inference

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("Invalid kernel configuration: {0}")]
    InvalidKernelConfig(String),

    #[error("Corrupt model: {0}")]
    CorruptModel(String),

    #[error("Probability estimates unavailable: model has no calibration parameters")]
    ProbabilityUnavailable,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, SVMError>;
