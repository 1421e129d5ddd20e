//! Spindle Detector
//!
//! Filters the recording into broadband and sigma signals, derives four
//! per-sample criteria from them and keeps the stretches where at least
//! three criteria agree.

use serde::Serialize;
use signal_filter::{BandpassFilter, FftResampler, FirBandpass, Resampler};
use signal_stats::{moving_transform, MovingMethod, WindowSpec};
use spectral::{instantaneous_frequency, stft_power, StftConfig};
use tracing::{debug, info};

use crate::config::DetectorConfig;
use crate::criteria::{CriterionSignals, CriterionVotes};
use crate::error::{SpindleError, ValidationError};
use crate::events::{bool_vector, filter_by_duration, merge_close_events, split_runs};
use crate::features::{FeatureExtractor, SpindleEvent};

/// Rate the signal is brought down to before detection (Hz)
const REFERENCE_RATE: f64 = 100.0;
/// Recordings at or above this rate are resampled to [`REFERENCE_RATE`]
const RESAMPLE_THRESHOLD: f64 = 200.0;

const STFT_WINDOW: f64 = 2.0;
const STFT_STEP: f64 = 0.05;
const MOVING_WINDOW: f64 = 0.3;
const MOVING_STEP: f64 = 0.1;

/// Mean-square floor before the log10
const ABS_POW_FLOOR: f64 = 1e-9;
/// Sigma bands wider than this are narrowed by 1 Hz on each side before
/// filtering; relative power still uses the configured band
const NARROW_BAND_WIDTH: f64 = 3.0;
const MIN_VOTES: u8 = 3;

/// Detected spindles in time order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpindleTable {
    /// Sampling rate the events were detected at (Hz)
    pub sf: f64,
    pub events: Vec<SpindleEvent>,
}

impl SpindleTable {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpindleEvent> {
        self.events.iter()
    }

    /// Render as CSV with a header row
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "Start,End,Duration,Amplitude,RMS,AbsPower,RelPower,Frequency,Oscillations,Symmetry,Confidence\n",
        );
        for ev in &self.events {
            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{},{},{}\n",
                ev.start,
                ev.end,
                ev.duration,
                ev.amplitude,
                ev.rms,
                ev.abs_power,
                ev.rel_power,
                ev.frequency,
                ev.oscillations,
                ev.symmetry,
                ev.confidence
            ));
        }
        out
    }

    /// 0/1 mask of `n` samples at `sf` Hz covering every event
    pub fn bool_vector(&self, n: usize, sf: f64) -> Vec<u8> {
        bool_vector(n, sf, self.events.iter().map(|ev| (ev.start, ev.end)))
    }
}

impl<'a> IntoIterator for &'a SpindleTable {
    type Item = &'a SpindleEvent;
    type IntoIter = std::slice::Iter<'a, SpindleEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Multi-criterion sleep spindle detector
pub struct SpindleDetector {
    config: DetectorConfig,
    filter: Box<dyn BandpassFilter>,
    resampler: Box<dyn Resampler>,
}

impl std::fmt::Debug for SpindleDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpindleDetector")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SpindleDetector {
    /// Create a detector with the default FIR filter and FFT resampler
    pub fn new(config: DetectorConfig) -> Result<Self, ValidationError> {
        Self::with_collaborators(
            config,
            Box::new(FirBandpass::new()),
            Box::new(FftResampler::new()),
        )
    }

    /// Create a detector with custom filtering and resampling
    pub fn with_collaborators(
        config: DetectorConfig,
        filter: Box<dyn BandpassFilter>,
        resampler: Box<dyn Resampler>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self {
            config,
            filter,
            resampler,
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect spindles in a single-channel recording sampled at `sf` Hz.
    ///
    /// Returns `Ok(None)` when no sample reaches three votes or when no
    /// candidate run has an acceptable duration.
    pub fn detect(&self, data: &[f64], sf: f64) -> Result<Option<SpindleTable>, SpindleError> {
        validate_input(data, sf)?;
        let cfg = &self.config;

        let (data, sf) = if sf >= RESAMPLE_THRESHOLD {
            let resampled = self.resampler.resample(data, REFERENCE_RATE / sf)?;
            debug!(from = sf, to = REFERENCE_RATE, samples = resampled.len(), "resampled");
            (resampled, REFERENCE_RATE)
        } else {
            (data.to_vec(), sf)
        };
        let n = data.len();

        let broadband = self.filter.filter(&data, sf, cfg.freq_broad.0, cfg.freq_broad.1)?;
        let trans = if cfg.freq_sp.1 - cfg.freq_sp.0 > NARROW_BAND_WIDTH { 1.0 } else { 0.0 };
        let sigma = self
            .filter
            .filter(&broadband, sf, cfg.freq_sp.0 + trans, cfg.freq_sp.1 - trans)?;

        let signals = self.criterion_signals(&broadband, &sigma, sf)?;
        let votes = CriterionVotes::compute(&signals, &cfg.thresh);

        let candidates = votes.candidates(MIN_VOTES);
        debug!(samples = n, candidates = candidates.len(), "criterion votes");
        if candidates.is_empty() {
            info!(samples = n, sf, "no sample reached the vote threshold");
            return Ok(None);
        }

        let merged = merge_close_events(&candidates, cfg.min_distance_ms, sf);
        let runs = split_runs(&merged);
        let kept = filter_by_duration(&runs, sf, cfg.duration);
        debug!(runs = runs.len(), kept = kept.len(), "duration filter");
        if kept.is_empty() {
            info!(runs = runs.len(), "no candidate run has an acceptable duration");
            return Ok(None);
        }

        let extractor = FeatureExtractor::new(sf);
        let events: Vec<SpindleEvent> = kept
            .iter()
            .filter_map(|&run| extractor.extract(&broadband, run, &signals, &votes))
            .collect();

        info!(
            spindles = events.len(),
            duration_s = n as f64 / sf,
            "spindle detection complete"
        );
        Ok(Some(SpindleTable { sf, events }))
    }

    fn criterion_signals(
        &self,
        broadband: &[f64],
        sigma: &[f64],
        sf: f64,
    ) -> Result<CriterionSignals, SpindleError> {
        let cfg = &self.config;
        let n = broadband.len();

        let stft = stft_power(
            broadband,
            sf,
            &StftConfig {
                window: STFT_WINDOW,
                step: STFT_STEP,
                band: Some(cfg.freq_broad),
                interp: true,
                norm: false,
            },
        )?;
        debug!(
            freqs = stft.freqs.len(),
            times = stft.times.len(),
            "stft power grid"
        );
        let rel_pow = fit_len(stft.relative_power(cfg.freq_sp.0, cfg.freq_sp.1), n);

        let spec = WindowSpec::new(MOVING_WINDOW, MOVING_STEP).interpolated();
        let corr = moving_transform(sigma, Some(broadband), sf, &spec, MovingMethod::Corr)?;
        let rms = moving_transform(sigma, None, sf, &spec, MovingMethod::Rms)?;
        let corr = fit_len(corr.values, n);
        let rms = fit_len(rms.values, n);

        let abs_pow_log = rms
            .iter()
            .map(|&r| {
                let ms = r * r;
                let ms = if ms <= 0.0 { ABS_POW_FLOOR } else { ms };
                ms.log10()
            })
            .collect();

        Ok(CriterionSignals {
            abs_pow_log,
            rel_pow,
            corr,
            rms,
            inst_freq: instantaneous_frequency(sigma, sf),
        })
    }
}

fn validate_input(data: &[f64], sf: f64) -> Result<(), ValidationError> {
    if !(sf > 0.0 && sf.is_finite()) {
        return Err(ValidationError::OutOfRange {
            field: "sf",
            value: sf,
            min: 0.0,
            max: f64::MAX,
        });
    }
    if data.is_empty() {
        return Err(ValidationError::InvalidFormat("empty signal".into()));
    }
    if let Some(i) = data.iter().position(|v| !v.is_finite()) {
        return Err(ValidationError::NonFiniteSample(i));
    }
    Ok(())
}

/// Truncate or zero-extend a per-sample trace to `n` samples
fn fit_len(mut values: Vec<f64>, n: usize) -> Vec<f64> {
    values.resize(n, 0.0);
    values
}
