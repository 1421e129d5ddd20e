//! Peak Detection
//!
//! Local maxima with a minimum horizontal distance, ranked by prominence.

/// Peaks found in a signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Peaks {
    /// Sample index of each peak, ascending
    pub indices: Vec<usize>,
    /// Prominence of each peak
    pub prominences: Vec<f64>,
}

impl Peaks {
    /// Number of peaks
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no peak was found
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index of the peak with the largest prominence (first on ties)
    pub fn most_prominent(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (&idx, &prom) in self.indices.iter().zip(&self.prominences) {
            match best {
                Some((_, p)) if prom <= p => {}
                _ => best = Some((idx, prom)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Find local maxima separated by at least `distance` samples.
///
/// Flat peaks resolve to the middle sample (rounded down). When two peaks
/// are closer than `ceil(distance)`, the higher one is kept.
pub fn find_peaks(x: &[f64], distance: f64) -> Peaks {
    let mut indices = local_maxima(x);
    if distance > 1.0 && indices.len() > 1 {
        indices = select_by_distance(x, &indices, distance.ceil() as usize);
    }
    let prominences = indices.iter().map(|&p| prominence(x, p)).collect();
    Peaks {
        indices,
        prominences,
    }
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let mut keep = vec![true; peaks.len()];

    // Visit peaks from highest to lowest
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

/// Height of the peak above the higher of its two bases. Each base is the
/// minimum reached before the signal rises above the peak or ends.
fn prominence(x: &[f64], peak: usize) -> f64 {
    let height = x[peak];

    let mut left_min = height;
    let mut i = peak;
    loop {
        if x[i] > height {
            break;
        }
        left_min = left_min.min(x[i]);
        if i == 0 {
            break;
        }
        i -= 1;
    }

    let mut right_min = height;
    for &v in &x[peak..] {
        if v > height {
            break;
        }
        right_min = right_min.min(v);
    }

    height - left_min.max(right_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_peaks() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 1.0];
        let peaks = find_peaks(&x, 1.0);
        assert_eq!(peaks.indices, vec![1, 3, 5]);
        assert_eq!(peaks.prominences, vec![1.0, 2.0, 2.0]);
        assert_eq!(peaks.most_prominent(), Some(3));
    }

    #[test]
    fn test_plateau_midpoint() {
        let x = [0.0, 2.0, 2.0, 2.0, 2.0, 0.0];
        assert_eq!(find_peaks(&x, 1.0).indices, vec![2]);
    }

    #[test]
    fn test_edges_are_not_peaks() {
        let x = [5.0, 1.0, 0.0, 1.0, 5.0];
        assert!(find_peaks(&x, 1.0).is_empty());
    }

    #[test]
    fn test_distance_keeps_highest() {
        let x = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.5, 0.0];
        let peaks = find_peaks(&x, 3.0);
        assert_eq!(peaks.indices, vec![3, 9]);
    }

    #[test]
    fn test_sine_peak_count() {
        // 13 Hz at 100 Hz for one second: 13 cycles, peaks >= 6 samples apart
        let x: Vec<f64> = (0..100)
            .map(|i| (2.0 * std::f64::consts::PI * 13.0 * i as f64 / 100.0).sin())
            .collect();
        let peaks = find_peaks(&x, 6.0);
        assert!((12..=13).contains(&peaks.len()));
    }
}
