//! Spectral Error Types

use signal_stats::StatsError;
use thiserror::Error;

/// Errors raised by spectral estimation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpectralError {
    /// Band lower edge must be below upper edge
    #[error("Invalid band: {low} Hz must be below {high} Hz")]
    InvalidBand { low: f64, high: f64 },

    /// STFT step longer than the window
    #[error("Step {step}s exceeds window {window}s")]
    StepExceedsWindow { step: f64, window: f64 },

    /// Sampling rate must be positive and finite
    #[error("Invalid sampling rate: {0}")]
    InvalidSamplingRate(f64),

    /// Window shorter than two samples
    #[error("Segment of {0} samples is too short")]
    SegmentTooShort(usize),

    /// Grid dimensions do not match the axis vectors
    #[error("Grid shape {rows}x{cols} does not match axes")]
    ShapeMismatch { rows: usize, cols: usize },

    /// Empty input signal
    #[error("Empty signal")]
    Empty,

    /// Interpolation failure
    #[error(transparent)]
    Stats(#[from] StatsError),
}
