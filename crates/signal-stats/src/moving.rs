//! Moving-Window Transforms
//!
//! Sliding RMS, correlation or covariance over one or two signals, with
//! optional cubic interpolation back onto the per-sample grid.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatsError;
use crate::interp::{CubicSpline, Extrapolate};
use crate::kernels::{corr, covar, rms};

/// Statistic computed in each window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovingMethod {
    /// Root mean square of the first signal
    Rms,
    /// Pearson correlation between the two signals
    Corr,
    /// Covariance between the two signals
    Covar,
}

impl MovingMethod {
    /// Lowercase method name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rms => "rms",
            Self::Corr => "corr",
            Self::Covar => "covar",
        }
    }

    /// Whether the method needs a second signal
    pub fn is_pairwise(&self) -> bool {
        !matches!(self, Self::Rms)
    }
}

impl FromStr for MovingMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rms" => Ok(Self::Rms),
            "corr" => Ok(Self::Corr),
            "covar" => Ok(Self::Covar),
            other => Err(StatsError::UnknownMethod(other.to_string())),
        }
    }
}

/// Window geometry, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Window length (s)
    pub window: f64,
    /// Distance between window centres (s); 0 means every sample
    pub step: f64,
    /// Resample the output onto one value per input sample
    pub interp: bool,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            window: 0.3,
            step: 0.1,
            interp: false,
        }
    }
}

impl WindowSpec {
    /// Window of `window` seconds every `step` seconds
    pub fn new(window: f64, step: f64) -> Self {
        Self {
            window,
            step,
            interp: false,
        }
    }

    /// Enable per-sample interpolation
    pub fn interpolated(mut self) -> Self {
        self.interp = true;
        self
    }
}

/// Output of a moving transform
#[derive(Debug, Clone, Default)]
pub struct MovingTransform {
    /// Time of each value (s)
    pub times: Vec<f64>,
    /// Statistic value
    pub values: Vec<f64>,
}

/// Apply `method` over sliding windows of `x` (and `y` for pairwise methods).
///
/// Window centres are placed every `step` seconds from 0 up to the signal
/// duration. Each window covers samples `beg..end` with both bounds
/// truncated from `(centre ∓ window/2)·sf` and clipped to the signal, so edge
/// windows are shorter rather than padded. The reported time is the middle
/// of the clipped window.
///
/// With `interp` set (and a step coarser than one sample) the values are
/// spline-interpolated at `i / sf` for every sample `i`; samples outside the
/// span of window centres are set to 0.
pub fn moving_transform(
    x: &[f64],
    y: Option<&[f64]>,
    sf: f64,
    spec: &WindowSpec,
    method: MovingMethod,
) -> Result<MovingTransform, StatsError> {
    if !(sf > 0.0 && sf.is_finite()) {
        return Err(StatsError::InvalidSamplingRate(sf));
    }
    if !(spec.window > 0.0 && spec.step >= 0.0 && spec.step.is_finite()) {
        return Err(StatsError::InvalidWindow {
            window: spec.window,
            step: spec.step,
        });
    }
    // RMS reads only `x`; pairwise methods always get a checked `y`
    let y: &[f64] = match (method.is_pairwise(), y) {
        (true, None) => return Err(StatsError::MissingSecondSignal(method.name())),
        (_, Some(y)) if y.len() != x.len() => {
            return Err(StatsError::LengthMismatch {
                left: x.len(),
                right: y.len(),
            })
        }
        (_, Some(y)) => y,
        (false, None) => x,
    };

    let n = x.len();
    if n == 0 {
        return Ok(MovingTransform::default());
    }

    let step = if spec.step == 0.0 { 1.0 / sf } else { spec.step };
    let halfdur = spec.window / 2.0;
    let total_dur = n as f64 / sf;
    let last = (n - 1) as i64;
    let n_windows = (total_dur / step).ceil() as usize;

    let mut times = Vec::with_capacity(n_windows);
    let mut values = Vec::with_capacity(n_windows);

    for k in 0..n_windows {
        let centre = k as f64 * step;
        let beg = (((centre - halfdur) * sf) as i64).max(0);
        let end = (((centre + halfdur) * sf) as i64).min(last);
        let (beg, end) = (beg as usize, end.max(beg) as usize);

        let value = match method {
            MovingMethod::Rms => rms(&x[beg..end]),
            MovingMethod::Corr => corr(&x[beg..end], &y[beg..end]),
            MovingMethod::Covar => covar(&x[beg..end], &y[beg..end]),
        };

        times.push((beg + end) as f64 / 2.0 / sf);
        values.push(value);
    }

    debug!(
        method = method.name(),
        windows = n_windows,
        samples = n,
        "moving transform"
    );

    if spec.interp && step != 1.0 / sf {
        let grid: Vec<f64> = (0..n).map(|i| i as f64 / sf).collect();
        let values = interpolate_onto(&times, &values, &grid)?;
        return Ok(MovingTransform {
            times: grid,
            values,
        });
    }

    Ok(MovingTransform { times, values })
}

fn interpolate_onto(times: &[f64], values: &[f64], grid: &[f64]) -> Result<Vec<f64>, StatsError> {
    // Clipped edge windows can share a centre time; keep the first of each
    let mut t = Vec::with_capacity(times.len());
    let mut v = Vec::with_capacity(values.len());
    for (&ti, &vi) in times.iter().zip(values) {
        if t.last().map_or(true, |&prev| ti > prev) {
            t.push(ti);
            v.push(vi);
        }
    }
    if t.len() < 4 {
        warn!(points = t.len(), "too few windows for cubic interpolation");
    }

    let spline = CubicSpline::new(&t, &v)?;
    Ok(spline.eval_many(grid, Extrapolate::Fill(0.0)))
}
