use serde::{Deserialize, Serialize};

use super::score_pair;
use crate::{
    config::valid_tolerance,
    error::{RequestError, Result},
};

// Half-time suggestions only make sense above this tempo, double-time below the other
const HALF_TIME_MIN_BPM: f64 = 120.0;
const DOUBLE_TIME_MAX_BPM: f64 = 100.0;

/// Smallest relative deviation between the source tempo and the candidate tempo
///
/// With `half_double` the candidate is also compared at half and double its
/// tempo, so 87 BPM material lines up with a 174 BPM source.
pub fn tempo_deviation(source_bpm: f64, candidate_bpm: f64, half_double: bool) -> f64 {
    let relative = |tempo: f64| (source_bpm - tempo).abs() / source_bpm;

    if half_double {
        [candidate_bpm, candidate_bpm / 2.0, candidate_bpm * 2.0]
            .into_iter()
            .map(relative)
            .fold(f64::INFINITY, f64::min)
    } else {
        relative(candidate_bpm)
    }
}

/// BPM compatibility: 1.0 at zero deviation, falling linearly to 0.0 at the tolerance
pub fn bpm_score(
    source_bpm: Option<f64>,
    candidate_bpm: Option<f64>,
    tolerance_percent: f64,
    half_double: bool,
) -> f64 {
    score_pair(source_bpm, candidate_bpm, |source, candidate| {
        let tolerance = tolerance_percent / 100.0;
        let deviation = tempo_deviation(source, candidate, half_double);
        if deviation >= tolerance {
            0.0
        } else {
            1.0 - deviation / tolerance
        }
    })
}

/// Pre-filter window around a source tempo
///
/// A tempo is inside the window exactly when it would earn a non-zero [`bpm_score`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmWindow {
    pub source_bpm: f64,
    pub tolerance_percent: f64,
    pub half_double: bool,
}

impl BpmWindow {
    pub fn new(source_bpm: f64, tolerance_percent: f64, half_double: bool) -> Self {
        Self {
            source_bpm,
            tolerance_percent,
            half_double,
        }
    }

    pub fn contains(&self, bpm: f64) -> bool {
        tempo_deviation(self.source_bpm, bpm, self.half_double) < self.tolerance_percent / 100.0
    }
}

/// A tempo target with its mixable range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoWindow {
    pub bpm: f64,
    pub min: f64,
    pub max: f64,
}

impl TempoWindow {
    fn around(bpm: f64, tolerance_percent: f64) -> Self {
        let spread = bpm * tolerance_percent / 100.0;
        Self {
            bpm,
            min: bpm - spread,
            max: bpm + spread,
        }
    }
}

/// Suggested tempo ranges for mixing out of a track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BpmRange {
    pub current: f64,
    pub range: TempoWindow,
    pub half_time: Option<TempoWindow>,
    pub double_time: Option<TempoWindow>,
}

impl BpmRange {
    /// Like [`suggest`](Self::suggest), rejecting a non-positive tempo or an out-of-range tolerance
    pub fn checked(bpm: f64, tolerance_percent: f64) -> Result<Self> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(RequestError::InvalidBpm { value: bpm }.into());
        }
        if !valid_tolerance(tolerance_percent) {
            return Err(RequestError::InvalidTolerance { value: tolerance_percent }.into());
        }
        Ok(Self::suggest(bpm, tolerance_percent))
    }

    pub fn suggest(bpm: f64, tolerance_percent: f64) -> Self {
        Self {
            current: bpm,
            range: TempoWindow::around(bpm, tolerance_percent),
            half_time: (bpm > HALF_TIME_MIN_BPM)
                .then(|| TempoWindow::around(bpm / 2.0, tolerance_percent)),
            double_time: (bpm < DOUBLE_TIME_MAX_BPM)
                .then(|| TempoWindow::around(bpm * 2.0, tolerance_percent)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::NEUTRAL_SCORE;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_tempo_scores_one() {
        for tolerance in [0.5, 4.0, 8.0, 50.0] {
            assert_eq!(bpm_score(Some(126.0), Some(126.0), tolerance, true), 1.0);
        }
    }

    #[test]
    fn test_half_and_double_time_match_exactly() {
        let same = bpm_score(Some(120.0), Some(120.0), 8.0, true);
        assert_eq!(bpm_score(Some(120.0), Some(60.0), 8.0, true), same);
        assert_eq!(bpm_score(Some(120.0), Some(240.0), 8.0, true), same);
        assert_eq!(bpm_score(Some(174.0), Some(87.0), 8.0, true), 1.0);
    }

    #[test]
    fn test_half_double_disabled() {
        assert_eq!(bpm_score(Some(120.0), Some(60.0), 8.0, false), 0.0);
    }

    #[test]
    fn test_linear_falloff() {
        // 4% off with an 8% window is halfway
        assert!(approx(bpm_score(Some(100.0), Some(104.0), 8.0, true), 0.5));
        assert_eq!(bpm_score(Some(100.0), Some(108.0), 8.0, true), 0.0);
        assert_eq!(bpm_score(Some(100.0), Some(130.0), 8.0, true), 0.0);
        // Same relative offset scores the same through half-time
        let direct = bpm_score(Some(128.0), Some(130.56), 8.0, true);
        let half = bpm_score(Some(128.0), Some(65.28), 8.0, true);
        assert!(approx(direct, half));
    }

    #[test]
    fn test_missing_bpm_is_neutral() {
        assert_eq!(bpm_score(None, Some(120.0), 8.0, true), NEUTRAL_SCORE);
        assert_eq!(bpm_score(Some(120.0), None, 8.0, true), NEUTRAL_SCORE);
    }

    #[test]
    fn test_bpm_window_matches_score() {
        let window = BpmWindow::new(128.0, 8.0, true);
        assert!(window.contains(128.0));
        assert!(window.contains(64.0));
        assert!(window.contains(133.0));
        assert!(!window.contains(140.0));
        assert!(!window.contains(90.0));
    }

    #[test]
    fn test_suggested_ranges() {
        let fast = BpmRange::suggest(174.0, 8.0);
        assert!(fast.half_time.is_some());
        assert!(fast.double_time.is_none());
        let half = fast.half_time.unwrap();
        assert!(approx(half.bpm, 87.0));
        assert!(approx(half.min, 80.04));

        let slow = BpmRange::suggest(90.0, 8.0);
        assert!(slow.half_time.is_none());
        assert!(approx(slow.double_time.unwrap().bpm, 180.0));

        let mid = BpmRange::suggest(110.0, 8.0);
        assert!(mid.half_time.is_none() && mid.double_time.is_none());
        assert!(approx(mid.range.max, 118.8));
    }

    #[test]
    fn test_checked_range_rejects_bad_input() {
        for tolerance in [-5.0, 0.0, 150.0, f64::NAN] {
            let err = BpmRange::checked(128.0, tolerance).unwrap_err();
            assert!(err.is_invalid_request(), "{} accepted", tolerance);
        }
        assert!(BpmRange::checked(0.0, 8.0).unwrap_err().is_invalid_request());
        assert!(BpmRange::checked(-120.0, 8.0).is_err());

        let range = BpmRange::checked(128.0, 8.0).unwrap();
        assert_eq!(range, BpmRange::suggest(128.0, 8.0));
        assert!(range.range.min < range.range.max);
    }
}
