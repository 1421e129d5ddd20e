//! Detection criteria and per-sample voting

use signal_stats::percentile;

use crate::config::ThresholdConfig;

/// Per-sample signals the thresholds are applied to
#[derive(Debug, Clone, Default)]
pub struct CriterionSignals {
    /// log10 of the sigma moving mean-square, floored at -9
    pub abs_pow_log: Vec<f64>,
    /// Sigma-band share of broadband STFT power
    pub rel_pow: Vec<f64>,
    /// Moving correlation between sigma and broadband signals
    pub corr: Vec<f64>,
    /// Moving RMS of the sigma signal
    pub rms: Vec<f64>,
    /// Instantaneous frequency of the sigma signal (one shorter)
    pub inst_freq: Vec<f64>,
}

/// The four criterion outcomes, one boolean per sample each
#[derive(Debug, Clone, Default)]
pub struct CriterionVotes {
    pub abs_pow: Vec<bool>,
    pub rel_pow: Vec<bool>,
    pub corr: Vec<bool>,
    pub rms: Vec<bool>,
}

impl CriterionVotes {
    /// Apply the thresholds. The RMS criterion compares against the
    /// `thresh.rms` percentile of the whole RMS trace and never fires on a
    /// zero RMS.
    pub fn compute(signals: &CriterionSignals, thresh: &ThresholdConfig) -> Self {
        let rms_cutoff = percentile(&signals.rms, thresh.rms).unwrap_or(f64::INFINITY);

        Self {
            abs_pow: signals.abs_pow_log.iter().map(|&v| v >= thresh.abs_pow).collect(),
            rel_pow: signals.rel_pow.iter().map(|&v| v >= thresh.rel_pow).collect(),
            corr: signals.corr.iter().map(|&v| v >= thresh.corr).collect(),
            rms: signals
                .rms
                .iter()
                .map(|&v| v > 0.0 && v >= rms_cutoff)
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.abs_pow.len()
    }

    /// Number of criteria satisfied at sample `i`, in 0..=4
    pub fn vote(&self, i: usize) -> u8 {
        let abs_pow = self.abs_pow[i];
        let rel_pow = self.rel_pow[i];
        let corr = self.corr[i];
        let rms = self.rms[i];
        abs_pow as u8 + rel_pow as u8 + corr as u8 + rms as u8
    }

    /// Vote count for every sample
    pub fn votes(&self) -> Vec<u8> {
        (0..self.len()).map(|i| self.vote(i)).collect()
    }

    /// Samples where at least `min_votes` criteria hold
    pub fn candidates(&self, min_votes: u8) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.vote(i) >= min_votes).collect()
    }
}
