//! Spectral Analysis
//!
//! Short-time Fourier power estimation and analytic-signal (Hilbert)
//! instantaneous phase and frequency.

mod error;
mod hilbert;
mod interp2d;
mod stft;

pub use error::SpectralError;
pub use hilbert::{analytic_signal, instantaneous_frequency, instantaneous_phase, next_fast_len};
pub use interp2d::interp2d_cubic;
pub use stft::{stft_power, StftConfig, StftPower};
