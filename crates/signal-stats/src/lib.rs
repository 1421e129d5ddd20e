//! Signal Statistics
//!
//! Fast statistical kernels, cubic spline interpolation, prominence-based
//! peak finding and moving-window transforms over single-channel signals.

mod error;
mod interp;
mod kernels;
mod moving;
mod peaks;

pub use error::StatsError;
pub use interp::{CubicSpline, Extrapolate};
pub use kernels::{corr, covar, detrend_linear, mean, median, percentile, rms};
pub use moving::{moving_transform, MovingMethod, MovingTransform, WindowSpec};
pub use peaks::{find_peaks, Peaks};
