//! Analytic Signal
//!
//! FFT-based Hilbert transform and the instantaneous phase and frequency
//! derived from it.

use rustfft::{num_complex::Complex, FftPlanner};

/// Smallest 2·3·5-smooth integer not below `target`
pub fn next_fast_len(target: usize) -> usize {
    if target <= 6 {
        return target;
    }
    let mut n = target;
    loop {
        let mut m = n;
        for p in [2, 3, 5] {
            while m % p == 0 {
                m /= p;
            }
        }
        if m == 1 {
            return n;
        }
        n += 1;
    }
}

/// Analytic signal of `x` computed over an `n_fft`-point transform.
///
/// The input is zero-padded (or truncated) to `n_fft` samples, negative
/// frequencies are removed and positive ones doubled; the result is
/// truncated back to the input length.
pub fn analytic_signal(x: &[f64], n_fft: usize) -> Vec<Complex<f64>> {
    if x.is_empty() || n_fft == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex<f64>> = x
        .iter()
        .take(n_fft)
        .map(|&v| Complex::new(v, 0.0))
        .collect();
    buffer.resize(n_fft, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n_fft).process(&mut buffer);

    let half = n_fft / 2;
    for (k, c) in buffer.iter_mut().enumerate() {
        let gain = if k == 0 || (n_fft % 2 == 0 && k == half) {
            1.0
        } else if k < (n_fft + 1) / 2 {
            2.0
        } else {
            0.0
        };
        *c *= gain;
    }

    planner.plan_fft_inverse(n_fft).process(&mut buffer);
    let norm = 1.0 / n_fft as f64;
    buffer.truncate(x.len().min(n_fft));
    buffer.iter_mut().for_each(|c| *c *= norm);
    buffer
}

/// Wrapped phase of the analytic signal, transform length `next_fast_len(n)`
pub fn instantaneous_phase(x: &[f64]) -> Vec<f64> {
    analytic_signal(x, next_fast_len(x.len()))
        .iter()
        .map(|c| c.arg())
        .collect()
}

/// `sf / 2π` times the first difference of the wrapped phase (length n − 1)
pub fn instantaneous_frequency(x: &[f64], sf: f64) -> Vec<f64> {
    let factor = sf / (2.0 * std::f64::consts::PI);
    instantaneous_phase(x)
        .windows(2)
        .map(|w| factor * (w[1] - w[0]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use signal_stats::median;

    #[test]
    fn test_next_fast_len() {
        assert_eq!(next_fast_len(0), 0);
        assert_eq!(next_fast_len(5), 5);
        assert_eq!(next_fast_len(7), 8);
        assert_eq!(next_fast_len(1000), 1000);
        assert_eq!(next_fast_len(1001), 1024);
        assert_eq!(next_fast_len(97), 100);
    }

    #[test]
    fn test_analytic_signal_of_cosine() {
        // cos -> cos + i sin over whole periods
        let n = 64;
        let x: Vec<f64> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64).cos())
            .collect();
        let z = analytic_signal(&x, n);
        for (i, c) in z.iter().enumerate() {
            let phase = 2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64;
            assert!((c.re - phase.cos()).abs() < 1e-9);
            assert!((c.im - phase.sin()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_instantaneous_frequency_of_sine() {
        let sf = 100.0;
        let x: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * 13.0 * i as f64 / sf).sin())
            .collect();
        let freq = instantaneous_frequency(&x, sf);
        assert_eq!(freq.len(), 999);
        assert!((median(&freq).unwrap() - 13.0).abs() < 0.1);
    }

    proptest! {
        #[test]
        fn prop_next_fast_len_is_smooth(n in 1usize..20_000) {
            let m = next_fast_len(n);
            prop_assert!(m >= n);
            let mut r = m;
            for p in [2, 3, 5] {
                while r % p == 0 {
                    r /= p;
                }
            }
            prop_assert_eq!(r, 1);
        }

        #[test]
        fn prop_analytic_real_part_matches_input(x in prop::collection::vec(-100.0f64..100.0, 1..300)) {
            let z = analytic_signal(&x, next_fast_len(x.len()));
            prop_assert_eq!(z.len(), x.len());
            for (c, v) in z.iter().zip(&x) {
                prop_assert!((c.re - v).abs() < 1e-6);
            }
        }
    }
}
