//! Event index utilities
//!
//! Conversions between flat sorted sample indices, contiguous runs and
//! per-sample masks.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Contiguous run of samples, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span from first to last sample, in seconds
    pub fn duration(&self, sf: f64) -> f64 {
        (self.end - self.start) as f64 / sf
    }

    /// Sample indices covered by the run
    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Fill gaps between supra-threshold indices that are closer than
/// `min_distance_ms`.
///
/// A gap between consecutive indices `a < b` (with `b - a > 1`) is filled
/// when `b - a < min_distance_ms / 1000 · sf`. A non-positive distance
/// returns the indices unchanged.
pub fn merge_close_events(index: &[usize], min_distance_ms: f64, sf: f64) -> Vec<usize> {
    if min_distance_ms <= 0.0 || index.len() < 2 {
        return index.to_vec();
    }

    let min_distance = min_distance_ms / 1000.0 * sf;
    let mut merged = Vec::with_capacity(index.len());
    merged.push(index[0]);
    for pair in index.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let gap = b - a;
        if gap > 1 && (gap as f64) < min_distance {
            merged.extend(a + 1..b);
        }
        merged.push(b);
    }
    merged
}

/// Group sorted indices into maximal contiguous runs
pub fn split_runs(index: &[usize]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut iter = index.iter().copied();
    let Some(first) = iter.next() else {
        return runs;
    };

    let mut current = Run::new(first, first);
    for i in iter {
        if i == current.end + 1 {
            current.end = i;
        } else {
            runs.push(current);
            current = Run::new(i, i);
        }
    }
    runs.push(current);
    runs
}

/// Expand runs into the flat sorted set of covered indices
pub fn events_to_index(runs: &[Run]) -> Vec<usize> {
    let mut index: Vec<usize> = runs.iter().flat_map(Run::indices).collect();
    index.sort_unstable();
    index.dedup();
    index
}

/// Keep runs whose duration lies strictly inside `(min, max)` seconds
pub fn filter_by_duration(runs: &[Run], sf: f64, (min, max): (f64, f64)) -> Vec<Run> {
    runs.iter()
        .copied()
        .filter(|run| {
            let duration = run.duration(sf);
            duration > min && duration < max
        })
        .collect()
}

/// Build a 0/1 mask of `n` samples marking every `[start, end]` interval
/// (seconds). Sample bounds are `round(t · sf)`; bounds past the signal
/// are clipped and events lying entirely outside are skipped.
pub fn bool_vector<I>(n: usize, sf: f64, events: I) -> Vec<u8>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut mask = vec![0u8; n];
    if n == 0 {
        return mask;
    }
    let last = n - 1;

    for (start, end) in events {
        let lo = (start * sf).round();
        let hi = (end * sf).round();
        if hi < 0.0 || lo > last as f64 || hi < lo {
            warn!(start, end, samples = n, "event outside signal, skipped");
            continue;
        }
        if lo < 0.0 || hi > last as f64 {
            warn!(start, end, samples = n, "event clipped to signal bounds");
        }
        let lo = lo.max(0.0) as usize;
        let hi = (hi as usize).min(last);
        mask[lo..=hi].fill(1);
    }
    mask
}

/// Indices where the mask is set
pub fn mask_to_index(mask: &[u8]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &m)| (m != 0).then_some(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_runs() {
        let runs = split_runs(&[2, 3, 4, 8, 9, 15]);
        assert_eq!(runs, vec![Run::new(2, 4), Run::new(8, 9), Run::new(15, 15)]);
        assert!(split_runs(&[]).is_empty());
    }

    #[test]
    fn test_merge_just_below_min_distance() {
        // 500 ms at 100 Hz = 50 samples; 119 -> 168 is 49
        let index: Vec<usize> = (100..120).chain(168..190).collect();
        let merged = merge_close_events(&index, 500.0, 100.0);
        assert_eq!(split_runs(&merged), vec![Run::new(100, 189)]);
    }

    #[test]
    fn test_merge_keeps_distant_runs() {
        // 119 -> 169 is exactly 50, not below the minimum
        let index: Vec<usize> = (100..120).chain(169..190).collect();
        let merged = merge_close_events(&index, 500.0, 100.0);
        assert_eq!(split_runs(&merged), vec![Run::new(100, 119), Run::new(169, 189)]);
        assert_eq!(merge_close_events(&index, 0.0, 100.0), index);
        assert_eq!(merge_close_events(&index, -10.0, 100.0), index);
    }

    #[test]
    fn test_duration_bounds_are_exclusive() {
        let sf = 100.0;
        let runs = vec![
            Run::new(0, 30),    // 0.30 s
            Run::new(100, 131), // 0.31 s
            Run::new(200, 450), // 2.50 s
            Run::new(500, 749), // 2.49 s
        ];
        let kept = filter_by_duration(&runs, sf, (0.3, 2.5));
        assert_eq!(kept, vec![Run::new(100, 131), Run::new(500, 749)]);
    }

    #[test]
    fn test_bool_vector_marks_inclusive_ranges() {
        let mask = bool_vector(10, 10.0, [(0.2, 0.4), (0.7, 0.7)]);
        assert_eq!(mask, vec![0, 0, 1, 1, 1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_bool_vector_clips_out_of_range() {
        let mask = bool_vector(5, 10.0, [(0.3, 2.0), (5.0, 6.0)]);
        assert_eq!(mask, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_events_to_index() {
        let index = events_to_index(&[Run::new(5, 7), Run::new(1, 2)]);
        assert_eq!(index, vec![1, 2, 5, 6, 7]);
    }

    proptest! {
        #[test]
        fn prop_runs_roundtrip(mut index in prop::collection::vec(0usize..500, 0..200)) {
            index.sort_unstable();
            index.dedup();
            let runs = split_runs(&index);
            prop_assert_eq!(events_to_index(&runs), index);
            prop_assert!(runs.windows(2).all(|w| w[0].end + 1 < w[1].start));
        }

        #[test]
        fn prop_mask_roundtrip(mut index in prop::collection::vec(0usize..300, 1..100)) {
            index.sort_unstable();
            index.dedup();
            let sf = 100.0;
            let runs = split_runs(&index);
            let events = runs.iter().map(|r| (r.start as f64 / sf, r.end as f64 / sf));
            let mask = bool_vector(300, sf, events);
            prop_assert_eq!(split_runs(&mask_to_index(&mask)), runs);
        }

        #[test]
        fn prop_merge_is_superset(mut index in prop::collection::vec(0usize..1000, 1..100), ms in 0.0f64..800.0) {
            index.sort_unstable();
            index.dedup();
            let merged = merge_close_events(&index, ms, 100.0);
            prop_assert!(merged.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(index.iter().all(|i| merged.binary_search(i).is_ok()));
        }
    }
}
