//! Signal Preprocessing
//!
//! Bandpass filtering and resampling capabilities used ahead of event
//! detection. Both are traits so callers can plug in their own filters;
//! [`FirBandpass`] and [`FftResampler`] are the default implementations.

mod error;
mod fir;
mod resample;

pub use error::FilterError;
pub use fir::FirBandpass;
pub use resample::FftResampler;

/// Linear or zero-phase bandpass filter preserving signal length
pub trait BandpassFilter: Send + Sync {
    /// Keep `low..high` Hz of `signal` sampled at `sf` Hz.
    /// A non-positive `low` gives a lowpass filter.
    fn filter(&self, signal: &[f64], sf: f64, low: f64, high: f64) -> Result<Vec<f64>, FilterError>;
}

/// Sample-rate converter
pub trait Resampler: Send + Sync {
    /// Resample `signal` by `ratio` (output rate / input rate)
    fn resample(&self, signal: &[f64], ratio: f64) -> Result<Vec<f64>, FilterError>;
}
