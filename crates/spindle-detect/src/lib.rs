//! Sleep Spindle Detection
//!
//! Detects spindles in single-channel sleep EEG by voting over four
//! criteria per sample:
//! - Absolute sigma power (log10 moving mean-square)
//! - Relative sigma power from the short-time Fourier transform
//! - Moving correlation between sigma-filtered and broadband signals
//! - Moving RMS percentile of the sigma-filtered signal
//!
//! Samples meeting at least three criteria are merged into events, filtered
//! by duration and described by amplitude, power, frequency, oscillation
//! count, symmetry and confidence.

pub mod config;
pub mod criteria;
pub mod detector;
pub mod error;
pub mod events;
pub mod features;

pub use config::{DetectorConfig, ThresholdConfig};
pub use criteria::{CriterionSignals, CriterionVotes};
pub use detector::{SpindleDetector, SpindleTable};
pub use error::{SpindleError, ValidationError};
pub use events::{
    bool_vector, events_to_index, filter_by_duration, mask_to_index, merge_close_events,
    split_runs, Run,
};
pub use features::{Confidence, FeatureExtractor, SpindleEvent};

pub use signal_filter::{BandpassFilter, FftResampler, FirBandpass, Resampler};
pub use signal_stats::{moving_transform, MovingMethod, MovingTransform, WindowSpec};
pub use spectral::{stft_power, StftConfig, StftPower};
