//! Per-Event Feature Extraction

use serde::{Deserialize, Serialize};
use signal_stats::{detrend_linear, find_peaks, mean, median, percentile, rms};

use crate::criteria::{CriterionSignals, CriterionVotes};
use crate::events::Run;

/// Minimum separation between two oscillation peaks (ms)
const PEAK_DISTANCE_MS: f64 = 60.0;

/// Vote count required across the upper quartile of a run for high confidence
const HIGH_CONFIDENCE_VOTES: f64 = 4.0;

/// Detection confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected spindle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpindleEvent {
    /// Onset (s)
    pub start: f64,
    /// Offset (s)
    pub end: f64,
    /// `end - start` (s)
    pub duration: f64,
    /// Peak-to-peak amplitude of the detrended segment
    pub amplitude: f64,
    #[serde(rename = "RMS")]
    pub rms: f64,
    /// Mean log10 sigma power over the event
    pub abs_power: f64,
    /// Mean relative sigma power over the event
    pub rel_power: f64,
    /// Median instantaneous frequency (Hz)
    pub frequency: f64,
    /// Number of oscillation peaks
    pub oscillations: usize,
    /// Position of the most prominent peak, as a fraction of the event
    pub symmetry: f64,
    pub confidence: Confidence,
}

/// Computes [`SpindleEvent`] metrics from a run of broadband samples
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor {
    sf: f64,
}

impl FeatureExtractor {
    pub fn new(sf: f64) -> Self {
        Self { sf }
    }

    /// Extract the features of `run`.
    ///
    /// `broadband` is the filtered signal the run indexes into; `signals`
    /// and `votes` are the per-sample criterion traces of the same signal.
    /// Returns `None` when the run is reversed or reaches past any of them.
    pub fn extract(
        &self,
        broadband: &[f64],
        run: Run,
        signals: &CriterionSignals,
        votes: &CriterionVotes,
    ) -> Option<SpindleEvent> {
        let available = [
            broadband.len(),
            signals.abs_pow_log.len(),
            signals.rel_pow.len(),
            votes.abs_pow.len(),
            votes.rel_pow.len(),
            votes.corr.len(),
            votes.rms.len(),
        ]
        .into_iter()
        .min()
        .unwrap_or(0);
        if run.start > run.end || run.end >= available {
            return None;
        }

        let segment = detrend_linear(&broadband[run.start..=run.end]);
        let (lo, hi) = segment
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let abs_power = mean(&signals.abs_pow_log[run.start..=run.end]);
        let rel_power = mean(&signals.rel_pow[run.start..=run.end]);

        // The frequency trace is one sample shorter than the signal
        let frequency = if signals.inst_freq.is_empty() {
            0.0
        } else {
            let last = signals.inst_freq.len() - 1;
            let freqs: Vec<f64> = run.indices().map(|i| signals.inst_freq[i.min(last)]).collect();
            median(&freqs).unwrap_or(0.0)
        };

        let peaks = find_peaks(&segment, PEAK_DISTANCE_MS * self.sf / 1000.0);
        let symmetry = peaks
            .most_prominent()
            .map_or(0.5, |idx| idx as f64 / segment.len() as f64);

        let run_votes: Vec<f64> = run.indices().map(|i| f64::from(votes.vote(i))).collect();
        let upper_quartile = percentile(&run_votes, 75.0).unwrap_or(0.0);
        let confidence = if upper_quartile == HIGH_CONFIDENCE_VOTES {
            Confidence::High
        } else {
            Confidence::Medium
        };

        let start = run.start as f64 / self.sf;
        let end = run.end as f64 / self.sf;
        Some(SpindleEvent {
            start,
            end,
            duration: run.duration(self.sf),
            amplitude: hi - lo,
            rms: rms(&segment),
            abs_power,
            rel_power,
            frequency,
            oscillations: peaks.len(),
            symmetry,
            confidence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst(n: usize, sf: f64, freq: f64) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / sf;
                let envelope = (std::f64::consts::PI * i as f64 / (n - 1) as f64).sin().powi(2);
                40.0 * envelope * (2.0 * std::f64::consts::PI * freq * t).sin() + 5.0 * t
            })
            .collect()
    }

    fn traces(n: usize, votes: [bool; 4]) -> (CriterionSignals, CriterionVotes) {
        let signals = CriterionSignals {
            abs_pow_log: vec![2.0; n],
            rel_pow: vec![0.4; n],
            corr: vec![0.9; n],
            rms: vec![10.0; n],
            inst_freq: vec![13.0; n - 1],
        };
        let votes = CriterionVotes {
            abs_pow: vec![votes[0]; n],
            rel_pow: vec![votes[1]; n],
            corr: vec![votes[2]; n],
            rms: vec![votes[3]; n],
        };
        (signals, votes)
    }

    #[test]
    fn test_extract_burst_features() {
        let sf = 100.0;
        let x = burst(101, sf, 12.0);
        let (signals, votes) = traces(101, [true; 4]);
        let event = FeatureExtractor::new(sf)
            .extract(&x, Run::new(0, 100), &signals, &votes)
            .unwrap();

        assert_eq!(event.start, 0.0);
        assert_eq!(event.end, 1.0);
        assert!((event.duration - 1.0).abs() < 1e-12);
        assert!((event.abs_power - 2.0).abs() < 1e-12);
        assert!((event.rel_power - 0.4).abs() < 1e-12);
        assert!((event.frequency - 13.0).abs() < 1e-12);
        assert!(event.amplitude > 60.0 && event.amplitude < 85.0);
        assert!((10..=13).contains(&event.oscillations));
        assert!((0.3..0.7).contains(&event.symmetry));
        assert_eq!(event.confidence, Confidence::High);
    }

    #[test]
    fn test_medium_confidence_and_flat_symmetry() {
        let (signals, votes) = traces(20, [true, true, true, false]);
        let flat = vec![0.0; 20];
        let event = FeatureExtractor::new(100.0)
            .extract(&flat, Run::new(5, 19), &signals, &votes)
            .unwrap();

        assert_eq!(event.confidence, Confidence::Medium);
        assert_eq!(event.oscillations, 0);
        assert_eq!(event.symmetry, 0.5);
        assert!(event.amplitude.abs() < 1e-9);
        assert!(event.rms.abs() < 1e-9);
    }

    #[test]
    fn test_frequency_clamps_last_sample() {
        let (mut signals, votes) = traces(10, [true; 4]);
        signals.inst_freq = (0..9).map(f64::from).collect();
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let event = FeatureExtractor::new(10.0)
            .extract(&x, Run::new(7, 9), &signals, &votes)
            .unwrap();
        // samples 7, 8, 8
        assert_eq!(event.frequency, 8.0);
    }

    #[test]
    fn test_run_outside_traces_is_rejected() {
        let (signals, votes) = traces(10, [true; 4]);
        let x = vec![0.0; 10];
        let extractor = FeatureExtractor::new(10.0);
        assert!(extractor.extract(&x, Run::new(5, 10), &signals, &votes).is_none());
        assert!(extractor.extract(&x, Run::new(6, 3), &signals, &votes).is_none());
        assert!(extractor.extract(&x[..6], Run::new(2, 7), &signals, &votes).is_none());
        assert!(extractor.extract(&x, Run::new(0, 9), &signals, &votes).is_some());
    }

    #[test]
    fn test_event_serializes_with_column_names() {
        let (signals, votes) = traces(10, [true; 4]);
        let x = vec![0.0; 10];
        let event = FeatureExtractor::new(10.0)
            .extract(&x, Run::new(2, 6), &signals, &votes)
            .unwrap();
        let json = serde_json::to_value(&event).unwrap();
        for key in ["Start", "End", "Duration", "RMS", "AbsPower", "Oscillations", "Confidence"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["Confidence"], "high");
    }
}
