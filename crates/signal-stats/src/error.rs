//! Statistics Error Types

use thiserror::Error;

/// Errors raised by the statistical kernels and transforms
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Paired inputs must have the same number of samples
    #[error("Input lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Method name not one of rms, corr, covar
    #[error("Unknown moving transform method: {0}")]
    UnknownMethod(String),

    /// Pairwise method called with a single signal
    #[error("Method {0} requires a second signal")]
    MissingSecondSignal(&'static str),

    /// Sampling rate must be positive and finite
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    /// Window length must be positive, step non-negative
    #[error("Invalid window: length {window}s, step {step}s")]
    InvalidWindow { window: f64, step: f64 },

    /// Interpolation abscissa must be strictly increasing
    #[error("Abscissa is not strictly increasing at index {0}")]
    NotIncreasing(usize),

    /// Abscissa and ordinate lengths differ, or no points supplied
    #[error("Invalid interpolation data: {x} abscissa vs {y} ordinate points")]
    InvalidPoints { x: usize, y: usize },
}
