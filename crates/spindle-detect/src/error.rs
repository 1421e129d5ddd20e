//! Detection Error Types

use signal_filter::FilterError;
use signal_stats::StatsError;
use spectral::SpectralError;
use thiserror::Error;

/// Input validation failures, raised before any computation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field name not recognised
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Band or range whose lower edge is not below its upper edge
    #[error("{field} lower edge {low} must be below upper edge {high}")]
    InvalidBand {
        field: &'static str,
        low: f64,
        high: f64,
    },

    /// NaN or infinite sample
    #[error("Non-finite sample at index {0}")]
    NonFiniteSample(usize),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Errors surfaced by the detection pipeline
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpindleError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Preprocessing failed: {0}")]
    Filter(#[from] FilterError),

    #[error("Spectral estimation failed: {0}")]
    Spectral(#[from] SpectralError),

    #[error("Moving transform failed: {0}")]
    Stats(#[from] StatsError),
}
