//! Zero-Phase FIR Bandpass Filter

use rustfft::{num_complex::Complex, FftPlanner};
use tracing::{debug, warn};

use crate::error::FilterError;
use crate::BandpassFilter;

/// Hamming-windowed sinc bandpass, applied without phase shift.
///
/// Transition bands are picked automatically from the band edges: the lower
/// one is `min(max(low/4, 2), low)` Hz, the upper one
/// `min(max(high/4, 2), nyquist - high)` Hz, with the cut-offs placed in
/// the middle of each transition. The filter length is
/// `length_factor · sf / narrowest transition`, forced odd.
#[derive(Debug, Clone)]
pub struct FirBandpass {
    /// Taps per (sf / transition width); 3.3 for a Hamming window
    length_factor: f64,
}

impl Default for FirBandpass {
    fn default() -> Self {
        Self { length_factor: 3.3 }
    }
}

impl FirBandpass {
    /// Create a filter with the default Hamming length factor
    pub fn new() -> Self {
        Self::default()
    }

    /// Design the filter taps for a band at a given sampling rate
    pub fn design(&self, sf: f64, low: f64, high: f64) -> Result<Vec<f64>, FilterError> {
        if !(sf > 0.0 && sf.is_finite()) {
            return Err(FilterError::InvalidSamplingRate(sf));
        }
        if !(low < high) {
            return Err(FilterError::InvalidBand { low, high });
        }
        let nyquist = sf / 2.0;
        if high >= nyquist {
            return Err(FilterError::AboveNyquist { high, nyquist });
        }

        let h_trans = (high * 0.25).max(2.0).min(nyquist - high);
        let l_trans = (low > 0.0).then(|| (low * 0.25).max(2.0).min(low));
        let min_trans = l_trans.map_or(h_trans, |l| l.min(h_trans));

        let mut length = ((self.length_factor * sf / min_trans).ceil() as usize).max(1);
        if length % 2 == 0 {
            length += 1;
        }
        let centre = (length - 1) as f64 / 2.0;

        let f_high = (high + h_trans / 2.0) / sf;
        let f_low = l_trans.map_or(0.0, |l| (low - l / 2.0) / sf);

        let mut taps: Vec<f64> = (0..length)
            .map(|i| {
                let t = i as f64 - centre;
                let window = if length > 1 {
                    0.54 - 0.46 * (2.0 * std::f64::consts::PI * i as f64 / (length - 1) as f64).cos()
                } else {
                    1.0
                };
                window * (lowpass(f_high, t) - lowpass(f_low, t))
            })
            .collect();

        // Unit gain in the middle of the passband
        let f_ref = if l_trans.is_some() { (low + high) / 2.0 / sf } else { 0.0 };
        let gain: f64 = taps
            .iter()
            .enumerate()
            .map(|(i, &h)| h * (2.0 * std::f64::consts::PI * f_ref * (i as f64 - centre)).cos())
            .sum();
        if gain.abs() > f64::EPSILON {
            taps.iter_mut().for_each(|h| *h /= gain);
        }

        debug!(low, high, taps = length, "designed FIR bandpass");
        Ok(taps)
    }
}

impl BandpassFilter for FirBandpass {
    fn filter(&self, signal: &[f64], sf: f64, low: f64, high: f64) -> Result<Vec<f64>, FilterError> {
        let taps = self.design(sf, low, high)?;
        if signal.is_empty() {
            return Ok(Vec::new());
        }

        let n = signal.len();
        if taps.len() > n {
            warn!(
                taps = taps.len(),
                samples = n,
                "filter is longer than the signal"
            );
        }

        let pad = taps.len().min(n) - 1;
        let padded = reflect_limited(signal, pad);
        let full = fft_convolve(&padded, &taps);
        let delay = (taps.len() - 1) / 2;
        Ok(full[pad + delay..pad + delay + n].to_vec())
    }
}

/// Ideal lowpass impulse response at normalised cut-off `fc` (cycles/sample)
fn lowpass(fc: f64, t: f64) -> f64 {
    if fc <= 0.0 {
        return 0.0;
    }
    let u = 2.0 * fc * t;
    let sinc = if u == 0.0 {
        1.0
    } else {
        (std::f64::consts::PI * u).sin() / (std::f64::consts::PI * u)
    };
    2.0 * fc * sinc
}

/// Point-reflect up to `n - 1` samples about each end, zero-fill the rest
fn reflect_limited(x: &[f64], pad: usize) -> Vec<f64> {
    let n = x.len();
    let reflected = pad.min(n - 1);
    let first = x[0];
    let last = x[n - 1];

    let mut out = Vec::with_capacity(n + 2 * pad);
    out.resize(pad - reflected, 0.0);
    out.extend((1..=reflected).rev().map(|k| 2.0 * first - x[k]));
    out.extend_from_slice(x);
    out.extend((1..=reflected).map(|k| 2.0 * last - x[n - 1 - k]));
    out.resize(n + 2 * pad, 0.0);
    out
}

/// Full linear convolution through the FFT
fn fft_convolve(x: &[f64], h: &[f64]) -> Vec<f64> {
    let out_len = x.len() + h.len() - 1;
    let size = out_len.next_power_of_two();

    let mut planner = FftPlanner::<f64>::new();
    let forward = planner.plan_fft_forward(size);
    let inverse = planner.plan_fft_inverse(size);

    let mut a: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
    a.resize(size, Complex::new(0.0, 0.0));
    let mut b: Vec<Complex<f64>> = h.iter().map(|&v| Complex::new(v, 0.0)).collect();
    b.resize(size, Complex::new(0.0, 0.0));

    forward.process(&mut a);
    forward.process(&mut b);
    for (u, v) in a.iter_mut().zip(&b) {
        *u *= v;
    }
    inverse.process(&mut a);

    let norm = 1.0 / size as f64;
    a.iter().take(out_len).map(|c| c.re * norm).collect()
}
