//! FFT Resampler

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::debug;

use crate::error::FilterError;
use crate::Resampler;

/// Resample by truncating or zero-extending the spectrum.
///
/// The output has `round(n · ratio)` samples and keeps the input amplitude.
/// The signal is treated as periodic, so edges may ring when the first and
/// last samples differ.
#[derive(Debug, Clone, Default)]
pub struct FftResampler;

impl FftResampler {
    /// Create a resampler
    pub fn new() -> Self {
        Self
    }
}

impl Resampler for FftResampler {
    fn resample(&self, signal: &[f64], ratio: f64) -> Result<Vec<f64>, FilterError> {
        if !(ratio > 0.0 && ratio.is_finite()) {
            return Err(FilterError::InvalidRatio(ratio));
        }
        let n_in = signal.len();
        let n_out = (n_in as f64 * ratio).round() as usize;
        if n_in == 0 || n_out == 0 {
            return Ok(Vec::new());
        }
        if n_out == n_in {
            return Ok(signal.to_vec());
        }

        let mut planner = FftPlanner::<f64>::new();
        let mut spectrum: Vec<Complex<f64>> =
            signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
        planner.plan_fft_forward(n_in).process(&mut spectrum);

        let shared = n_in.min(n_out);
        let positive = shared / 2 + 1;
        let negative = shared - positive;

        let mut out = vec![Complex::new(0.0, 0.0); n_out];
        out[..positive].copy_from_slice(&spectrum[..positive]);
        out[n_out - negative..].copy_from_slice(&spectrum[n_in - negative..]);

        // Split or merge the Nyquist bin shared by both halves
        if shared % 2 == 0 {
            let nyq = shared / 2;
            if n_out < n_in {
                out[nyq] += spectrum[n_in - nyq];
            } else {
                let half = out[nyq] * 0.5;
                out[nyq] = half;
                out[n_out - nyq] = half;
            }
        }

        planner.plan_fft_inverse(n_out).process(&mut out);
        let norm = 1.0 / n_in as f64;

        debug!(n_in, n_out, ratio, "resampled signal");
        Ok(out.iter().map(|c| c.re * norm).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize, sf: f64, freq: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / sf).sin())
            .collect()
    }

    #[test]
    fn test_downsample_periodic_sine() {
        let x = sine(2000, 200.0, 5.0);
        let y = FftResampler::new().resample(&x, 0.5).unwrap();
        let expected = sine(1000, 100.0, 5.0);
        assert_eq!(y.len(), 1000);
        for (a, b) in y.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_upsample_periodic_sine() {
        let x = sine(500, 100.0, 3.0);
        let y = FftResampler::new().resample(&x, 2.0).unwrap();
        let expected = sine(1000, 200.0, 3.0);
        for (a, b) in y.iter().zip(&expected) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_output_length_rounds() {
        let x = vec![1.0; 1001];
        let y = FftResampler::new().resample(&x, 100.0 / 256.0).unwrap();
        assert_eq!(y.len(), 391);
        assert!(y.iter().all(|v| (v - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_invalid_ratio() {
        assert_eq!(
            FftResampler::new().resample(&[1.0], -1.0).unwrap_err(),
            FilterError::InvalidRatio(-1.0)
        );
    }
}
