//! Cubic Spline Interpolation
//!
//! Interpolating cubic spline with not-a-knot end conditions, evaluated with
//! either a constant fill value or nearest-edge extrapolation outside the
//! data range.

use crate::error::StatsError;

/// Behaviour outside `[x_0, x_last]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrapolate {
    /// Return a constant
    Fill(f64),
    /// Return the value at the nearest edge
    Nearest,
}

/// Piecewise cubic interpolant through strictly increasing abscissae.
///
/// Four or more points give a not-a-knot spline, two or three points fall
/// back to linear segments, a single point is only defined at its abscissa.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots (all zero in the linear fallback)
    m: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `(x, y)`
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, StatsError> {
        if x.len() != y.len() || x.is_empty() {
            return Err(StatsError::InvalidPoints {
                x: x.len(),
                y: y.len(),
            });
        }
        if let Some(i) = x.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(StatsError::NotIncreasing(i + 1));
        }

        let m = if x.len() >= 4 {
            not_a_knot_second_derivatives(x, y)
        } else {
            vec![0.0; x.len()]
        };

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    /// Number of knots
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the spline has no knots (never true for a constructed spline)
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Evaluate at a single point
    pub fn eval(&self, xq: f64, extrapolate: Extrapolate) -> f64 {
        let n = self.x.len();
        let first = self.x[0];
        let last = self.x[n - 1];

        if xq < first || xq > last || xq.is_nan() {
            return match extrapolate {
                Extrapolate::Fill(v) => v,
                Extrapolate::Nearest if xq > last => self.y[n - 1],
                Extrapolate::Nearest => self.y[0],
            };
        }
        if n == 1 {
            return self.y[0];
        }

        // Interval i such that x[i] <= xq <= x[i + 1]
        let i = self.x.partition_point(|&k| k <= xq).clamp(1, n - 1) - 1;
        self.eval_segment(i, xq)
    }

    /// Evaluate at many points
    pub fn eval_many(&self, xq: &[f64], extrapolate: Extrapolate) -> Vec<f64> {
        xq.iter().map(|&q| self.eval(q, extrapolate)).collect()
    }

    fn eval_segment(&self, i: usize, xq: f64) -> f64 {
        let h = self.x[i + 1] - self.x[i];
        let a = self.x[i + 1] - xq;
        let b = xq - self.x[i];
        let (mi, mj) = (self.m[i], self.m[i + 1]);

        mi * a * a * a / (6.0 * h)
            + mj * b * b * b / (6.0 * h)
            + (self.y[i] / h - mi * h / 6.0) * a
            + (self.y[i + 1] / h - mj * h / 6.0) * b
    }
}

/// Solve for knot second derivatives under not-a-knot conditions.
///
/// The end conditions (continuous third derivative at x_1 and x_{n-2}) are
/// eliminated into the first and last interior rows, leaving a tridiagonal
/// system over M_1..M_{n-2}.
fn not_a_knot_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let d: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    let k = n - 2;
    let mut sub = vec![0.0; k];
    let mut diag = vec![0.0; k];
    let mut sup = vec![0.0; k];
    let mut rhs = vec![0.0; k];

    for r in 0..k {
        let i = r + 1;
        sub[r] = h[i - 1];
        diag[r] = 2.0 * (h[i - 1] + h[i]);
        sup[r] = h[i];
        rhs[r] = 6.0 * (d[i] - d[i - 1]);
    }

    // M_0 = ((h0 + h1) M_1 - h0 M_2) / h1
    let (h0, h1) = (h[0], h[1]);
    diag[0] = (h0 + h1) * (2.0 * h1 + h0) / h1;
    sup[0] = (h1 * h1 - h0 * h0) / h1;
    sub[0] = 0.0;

    // M_{n-1} = ((a + b) M_{n-2} - b M_{n-3}) / a
    let (a, b) = (h[n - 3], h[n - 2]);
    diag[k - 1] = (a + b) * (2.0 * a + b) / a;
    sub[k - 1] = (a * a - b * b) / a;
    sup[k - 1] = 0.0;

    // Thomas algorithm
    for r in 1..k {
        let w = sub[r] / diag[r - 1];
        diag[r] -= w * sup[r - 1];
        rhs[r] -= w * rhs[r - 1];
    }
    let mut inner = vec![0.0; k];
    inner[k - 1] = rhs[k - 1] / diag[k - 1];
    for r in (0..k - 1).rev() {
        inner[r] = (rhs[r] - sup[r] * inner[r + 1]) / diag[r];
    }

    let mut m = vec![0.0; n];
    m[1..n - 1].copy_from_slice(&inner);
    m[0] = ((h0 + h1) * m[1] - h0 * m[2]) / h1;
    m[n - 1] = ((a + b) * m[n - 2] - b * m[n - 3]) / a;
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproduces_cubic_polynomial() {
        // Not-a-knot splines are exact for cubics
        let f = |t: f64| 0.5 * t * t * t - 2.0 * t * t + t - 3.0;
        let x: Vec<f64> = vec![0.0, 0.4, 1.1, 1.5, 2.3, 3.0, 3.2, 4.0];
        let y: Vec<f64> = x.iter().map(|&t| f(t)).collect();
        let spline = CubicSpline::new(&x, &y).unwrap();

        for q in [0.1, 0.75, 1.9, 2.95, 3.7] {
            assert!((spline.eval(q, Extrapolate::Fill(0.0)) - f(q)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_passes_through_knots() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|t| (t * 7.0).sin()).collect();
        let spline = CubicSpline::new(&x, &y).unwrap();
        for (xi, yi) in x.iter().zip(&y) {
            assert!((spline.eval(*xi, Extrapolate::Nearest) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn test_extrapolation_modes() {
        let spline = CubicSpline::new(&[0.0, 1.0, 2.0, 3.0], &[1.0, 2.0, 0.0, 5.0]).unwrap();
        assert_eq!(spline.eval(-0.5, Extrapolate::Fill(0.0)), 0.0);
        assert_eq!(spline.eval(3.5, Extrapolate::Fill(0.0)), 0.0);
        assert_eq!(spline.eval(-0.5, Extrapolate::Nearest), 1.0);
        assert_eq!(spline.eval(3.5, Extrapolate::Nearest), 5.0);
    }

    #[test]
    fn test_linear_fallback() {
        let spline = CubicSpline::new(&[0.0, 2.0], &[0.0, 4.0]).unwrap();
        assert!((spline.eval(0.5, Extrapolate::Fill(0.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_unsorted() {
        let err = CubicSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::NotIncreasing(2));
        assert!(CubicSpline::new(&[], &[]).is_err());
    }
}
