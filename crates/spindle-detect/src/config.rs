//! Detector configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Per-criterion detection thresholds.
///
/// Deserialization goes through [`ThresholdConfig::try_from`], so a missing
/// or unknown key is rejected with a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HashMap<String, f64>")]
pub struct ThresholdConfig {
    /// Absolute log10 power of the sigma-filtered signal
    pub abs_pow: f64,
    /// Relative power (sigma band / broadband), in [0, 1]
    pub rel_pow: f64,
    /// Percentile of the sigma moving RMS, in [0, 100]
    pub rms: f64,
    /// Pearson correlation between sigma and broadband signals, in [-1, 1]
    pub corr: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            abs_pow: 1.25,
            rel_pow: 0.20,
            rms: 95.0,
            corr: 0.69,
        }
    }
}

impl ThresholdConfig {
    /// Field names, in declaration order
    pub const FIELDS: [&'static str; 4] = ["abs_pow", "rel_pow", "rms", "corr"];

    /// Check every threshold lies in its domain
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.abs_pow.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "abs_pow",
                value: self.abs_pow,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        check_range("rel_pow", self.rel_pow, 0.0, 1.0)?;
        check_range("rms", self.rms, 0.0, 100.0)?;
        check_range("corr", self.corr, -1.0, 1.0)?;
        Ok(())
    }
}

impl TryFrom<HashMap<String, f64>> for ThresholdConfig {
    type Error = ValidationError;

    fn try_from(mut map: HashMap<String, f64>) -> Result<Self, Self::Error> {
        let mut take = |field: &'static str| map.remove(field).ok_or(ValidationError::MissingField(field));
        let config = Self {
            abs_pow: take("abs_pow")?,
            rel_pow: take("rel_pow")?,
            rms: take("rms")?,
            corr: take("corr")?,
        };

        if let Some(extra) = map.into_keys().min() {
            return Err(ValidationError::UnknownField(extra));
        }
        config.validate()?;
        Ok(config)
    }
}

/// Spindle detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Spindle frequency band (Hz)
    pub freq_sp: (f64, f64),

    /// Broadband reference band (Hz)
    pub freq_broad: (f64, f64),

    /// Accepted spindle duration (s), both bounds exclusive
    pub duration: (f64, f64),

    /// Events closer than this (ms) are merged; 0 disables merging
    pub min_distance_ms: f64,

    /// Detection thresholds
    pub thresh: ThresholdConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            freq_sp: (11.0, 16.0),
            freq_broad: (0.5, 30.0),
            duration: (0.3, 2.5),
            min_distance_ms: 500.0,
            thresh: ThresholdConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Create strict config (higher thresholds, fewer but cleaner events)
    pub fn strict() -> Self {
        Self {
            thresh: ThresholdConfig {
                abs_pow: 1.5,
                rel_pow: 0.3,
                rms: 97.5,
                corr: 0.75,
            },
            ..Default::default()
        }
    }

    /// Create lenient config (lower thresholds, more events)
    pub fn lenient() -> Self {
        Self {
            thresh: ThresholdConfig {
                abs_pow: 1.0,
                rel_pow: 0.15,
                rms: 90.0,
                corr: 0.6,
            },
            ..Default::default()
        }
    }

    /// Validate band ordering, duration range and thresholds
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_band("freq_sp", self.freq_sp)?;
        check_band("freq_broad", self.freq_broad)?;
        check_band("duration", self.duration)?;
        if self.freq_sp.0 < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "freq_sp",
                value: self.freq_sp.0,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.freq_broad.0 < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "freq_broad",
                value: self.freq_broad.0,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if self.duration.0 < 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "duration",
                value: self.duration.0,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if !self.min_distance_ms.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: "min_distance_ms",
                value: self.min_distance_ms,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        self.thresh.validate()
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ValidationError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

fn check_band(field: &'static str, (low, high): (f64, f64)) -> Result<(), ValidationError> {
    if low < high && low.is_finite() && high.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidBand { field, low, high })
    }
}
