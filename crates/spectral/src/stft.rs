//! Short-Time Fourier Power
//!
//! Time-frequency power grid from a Hann-windowed STFT, restricted to a
//! frequency band and optionally interpolated to one column per sample.

use ndarray::{Array2, Axis};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SpectralError;
use crate::interp2d::interp2d_cubic;

/// STFT power parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StftConfig {
    /// Segment length (s); longer windows give finer frequency resolution
    pub window: f64,
    /// Hop between segments (s); 0 means one sample
    pub step: f64,
    /// Inclusive frequency band to keep (Hz)
    pub band: Option<(f64, f64)>,
    /// Interpolate onto one column per input sample
    pub interp: bool,
    /// Divide each column by its sum over the kept band
    pub norm: bool,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            window: 4.0,
            step: 0.1,
            band: Some((0.5, 30.0)),
            interp: true,
            norm: false,
        }
    }
}

/// Power grid with its axes
#[derive(Debug, Clone)]
pub struct StftPower {
    /// Frequency of each row (Hz)
    pub freqs: Vec<f64>,
    /// Time of each column (s)
    pub times: Vec<f64>,
    /// Power, rows = frequencies, columns = times
    pub power: Array2<f64>,
}

impl StftPower {
    /// Per-column sum over rows with `low <= f <= high`
    pub fn band_sum(&self, low: f64, high: f64) -> Vec<f64> {
        let mut sums = vec![0.0; self.times.len()];
        for (row, &f) in self.power.axis_iter(Axis(0)).zip(&self.freqs) {
            if f >= low && f <= high {
                for (s, &p) in sums.iter_mut().zip(row.iter()) {
                    *s += p;
                }
            }
        }
        sums
    }

    /// Per-column sum over all rows
    pub fn total(&self) -> Vec<f64> {
        self.power.sum_axis(Axis(0)).to_vec()
    }

    /// Fraction of each column's power inside `[low, high]`, 0 where the
    /// column carries no power
    pub fn relative_power(&self, low: f64, high: f64) -> Vec<f64> {
        self.band_sum(low, high)
            .into_iter()
            .zip(self.total())
            .map(|(band, total)| if total > 0.0 { band / total } else { 0.0 })
            .collect()
    }
}

/// Compute the STFT power of `data`.
///
/// Segments of `trunc(window·sf)` samples overlap by
/// `trunc(nperseg − step·sf)`. The signal is extended by half a segment of
/// zeros on each side and zero-padded so the last segment is complete.
/// Every segment is mean-detrended, multiplied by a periodic Hann window
/// and transformed; coefficients are scaled by the inverse window sum
/// before squaring.
pub fn stft_power(data: &[f64], sf: f64, config: &StftConfig) -> Result<StftPower, SpectralError> {
    if !(sf > 0.0 && sf.is_finite()) {
        return Err(SpectralError::InvalidSamplingRate(sf));
    }
    if config.step > config.window {
        return Err(SpectralError::StepExceedsWindow {
            step: config.step,
            window: config.window,
        });
    }
    if let Some((low, high)) = config.band {
        if !(low < high) {
            return Err(SpectralError::InvalidBand { low, high });
        }
    }
    if data.is_empty() {
        return Err(SpectralError::Empty);
    }

    let step = if config.step == 0.0 { 1.0 / sf } else { config.step };
    let nperseg = (config.window * sf) as usize;
    if nperseg < 2 {
        return Err(SpectralError::SegmentTooShort(nperseg));
    }
    let noverlap = ((nperseg as f64 - step * sf) as i64).clamp(0, nperseg as i64 - 1) as usize;
    let hop = nperseg - noverlap;

    let edge = nperseg / 2;
    let mut extended = Vec::with_capacity(data.len() + 2 * edge + hop);
    extended.resize(edge, 0.0);
    extended.extend_from_slice(data);
    extended.resize(extended.len() + edge, 0.0);
    let overhang = (extended.len() - nperseg) % hop;
    if overhang != 0 {
        extended.resize(extended.len() + hop - overhang, 0.0);
    }
    let n_segments = (extended.len() - noverlap) / hop;

    let window: Vec<f64> = (0..nperseg)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / nperseg as f64).cos())
        .collect();
    let scale = 1.0 / window.iter().sum::<f64>();

    let all_freqs: Vec<f64> = (0..=nperseg / 2)
        .map(|k| k as f64 * sf / nperseg as f64)
        .collect();
    let kept: Vec<usize> = match config.band {
        Some((low, high)) => (0..all_freqs.len())
            .filter(|&k| all_freqs[k] >= low && all_freqs[k] <= high)
            .collect(),
        None => (0..all_freqs.len()).collect(),
    };
    let freqs: Vec<f64> = kept.iter().map(|&k| all_freqs[k]).collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);
    let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];
    let mut power = Array2::<f64>::zeros((kept.len(), n_segments));

    for s in 0..n_segments {
        let segment = &extended[s * hop..s * hop + nperseg];
        let seg_mean = segment.iter().sum::<f64>() / nperseg as f64;
        for ((slot, &v), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *slot = Complex::new((v - seg_mean) * w, 0.0);
        }
        fft.process(&mut buffer);
        for (row, &bin) in kept.iter().enumerate() {
            power[[row, s]] = (buffer[bin] * scale).norm_sqr();
        }
    }

    let mut times: Vec<f64> = (0..n_segments).map(|s| (s * hop) as f64 / sf).collect();

    debug!(
        nperseg,
        hop,
        segments = n_segments,
        bins = freqs.len(),
        "stft power grid"
    );

    if config.interp {
        let grid: Vec<f64> = (0..data.len()).map(|i| i as f64 / sf).collect();
        power = interp2d_cubic(&times, &freqs, &power, &grid, &freqs)?;
        times = grid;
    }

    if config.norm {
        for mut column in power.axis_iter_mut(Axis(1)) {
            let sum: f64 = column.sum();
            if sum != 0.0 {
                column.mapv_inplace(|p| p / sum);
            }
        }
    }

    Ok(StftPower {
        freqs,
        times,
        power,
    })
}
