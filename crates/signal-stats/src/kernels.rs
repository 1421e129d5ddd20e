//! Statistical Kernels
//!
//! Scalar reductions used by the moving-window transforms and the per-event
//! feature extractor. Degenerate inputs (empty or constant slices) produce a
//! finite value instead of NaN so they can be compared against thresholds.

/// Arithmetic mean, 0 for an empty slice
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// Root mean square: sqrt(mean(x²)), 0 for an empty slice
pub fn rms(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
}

/// Pearson correlation of two equal-length slices.
///
/// Returns 0 when fewer than two samples are available or when either
/// slice has zero variance.
pub fn corr(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mx = mean(x);
    let my = mean(y);

    let mut num = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        num += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let den = sxx.sqrt() * syy.sqrt();
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Unbiased covariance (n - 1 denominator), 0 for fewer than two samples
pub fn covar(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let mx = mean(x);
    let my = mean(y);
    let cov: f64 = x.iter().zip(y).map(|(&a, &b)| (a - mx) * (b - my)).sum();
    cov / (n - 1) as f64
}

/// Percentile with linear interpolation between order statistics.
///
/// `p` is expressed in percent and clamped to [0, 100].
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median, averaging the two middle values for even lengths
pub fn median(values: &[f64]) -> Option<f64> {
    percentile(values, 50.0)
}

/// Remove the least-squares linear trend over the sample index
pub fn detrend_linear(x: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let tm = (n - 1) as f64 / 2.0;
    let xm = mean(x);
    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &v) in x.iter().enumerate() {
        let dt = i as f64 - tm;
        num += dt * (v - xm);
        den += dt * dt;
    }
    let slope = num / den;

    x.iter()
        .enumerate()
        .map(|(i, &v)| v - (xm + slope * (i as f64 - tm)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant() {
        let values = vec![-3.0; 17];
        assert!((rms(&values) - 3.0).abs() < 1e-12);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_corr_with_itself() {
        let x: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin()).collect();
        assert!((corr(&x, &x) - 1.0).abs() < 1e-12);

        let neg: Vec<f64> = x.iter().map(|v| -2.0 * v).collect();
        assert!((corr(&x, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_corr_degenerate_windows() {
        assert_eq!(corr(&[1.0], &[2.0]), 0.0);
        assert_eq!(corr(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_covar() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        // var(x) = 1.6667, cov = 2 * var(x)
        assert!((covar(&x, &y) - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(covar(&[5.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(4.0));
        assert!((percentile(&values, 75.0).unwrap() - 3.25).abs() < 1e-12);
        assert_eq!(median(&values), Some(2.5));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_detrend_removes_line() {
        let x: Vec<f64> = (0..20).map(|i| 3.0 + 0.5 * i as f64).collect();
        assert!(detrend_linear(&x).iter().all(|v| v.abs() < 1e-9));

        let wave: Vec<f64> = (0..40)
            .map(|i| 10.0 + 2.0 * i as f64 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let det = detrend_linear(&wave);
        assert!(mean(&det).abs() < 1e-9);
        let ptp = det.iter().cloned().fold(f64::MIN, f64::max)
            - det.iter().cloned().fold(f64::MAX, f64::min);
        assert!((ptp - 2.0).abs() < 0.2);
    }
}
