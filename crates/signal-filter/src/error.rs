//! Filter Error Types

use thiserror::Error;

/// Errors during filtering or resampling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// Lower edge must be below upper edge
    #[error("Invalid band: {low} Hz must be below {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    /// Upper edge must lie below the Nyquist frequency
    #[error("Upper edge {high} Hz is not below Nyquist {nyquist} Hz")]
    AboveNyquist { high: f64, nyquist: f64 },

    /// Sampling rate must be positive and finite
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    /// Resampling ratio must be positive and finite
    #[error("Invalid resampling ratio: {0}")]
    InvalidRatio(f64),
}
