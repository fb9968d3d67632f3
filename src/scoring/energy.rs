use serde::{Deserialize, Serialize};

use super::score_pair;
use crate::features::EnergyDirection;

/// Breakpoints of the energy-flow curve
///
/// For `build` the score rises linearly from 0 at `floor_delta` to 1 at
/// `target_delta`, then falls back to 0 at `ceiling_delta`. `drop` mirrors it
/// around zero. `maintain` peaks at no change and reaches 0 at `maintain_window`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyCurve {
    /// Energy change that scores 1.0 when building
    pub target_delta: f64,

    /// Change (negative) at or below which a build scores 0.0
    pub floor_delta: f64,

    /// Change at or above which a build scores 0.0
    pub ceiling_delta: f64,

    /// Absolute change at which `maintain` scores 0.0
    pub maintain_window: f64,
}

impl Default for EnergyCurve {
    fn default() -> Self {
        Self {
            target_delta: 0.15,
            floor_delta: -0.1,
            ceiling_delta: 0.5,
            maintain_window: 0.3,
        }
    }
}

impl EnergyCurve {
    /// Score of an energy change when building
    fn build(&self, delta: f64) -> f64 {
        if delta <= self.floor_delta || delta >= self.ceiling_delta {
            0.0
        } else if delta <= self.target_delta {
            (delta - self.floor_delta) / (self.target_delta - self.floor_delta)
        } else {
            (self.ceiling_delta - delta) / (self.ceiling_delta - self.target_delta)
        }
    }

    fn maintain(&self, delta: f64) -> f64 {
        1.0 - delta.abs() / self.maintain_window
    }

    pub fn score(&self, delta: f64, direction: EnergyDirection) -> f64 {
        let score = match direction {
            EnergyDirection::Build => self.build(delta),
            EnergyDirection::Maintain => self.maintain(delta),
            EnergyDirection::Drop => self.build(-delta),
        };
        score.clamp(0.0, 1.0)
    }
}

/// Fit of the candidate's energy change to the requested direction
pub fn energy_score(
    source_energy: Option<f64>,
    candidate_energy: Option<f64>,
    direction: EnergyDirection,
    curve: &EnergyCurve,
) -> f64 {
    score_pair(source_energy, candidate_energy, |source, candidate| {
        curve.score(candidate - source, direction)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::NEUTRAL_SCORE;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn score(source: f64, candidate: f64, direction: EnergyDirection) -> f64 {
        energy_score(Some(source), Some(candidate), direction, &EnergyCurve::default())
    }

    #[test]
    fn test_build_peaks_at_target() {
        assert!(approx(score(0.5, 0.65, EnergyDirection::Build), 1.0));
        assert!(score(0.5, 0.3, EnergyDirection::Build) < 0.1);
        assert_eq!(score(0.5, 0.3, EnergyDirection::Build), 0.0);
    }

    #[test]
    fn test_build_shape() {
        let curve = EnergyCurve::default();
        assert!(approx(curve.score(0.0, EnergyDirection::Build), 0.4));
        assert!(approx(curve.score(0.3, EnergyDirection::Build), 0.2 / 0.35));
        assert_eq!(curve.score(-0.1, EnergyDirection::Build), 0.0);
        assert_eq!(curve.score(0.5, EnergyDirection::Build), 0.0);
        assert_eq!(curve.score(0.9, EnergyDirection::Build), 0.0);
        // Rising energy beats falling energy when building
        assert!(curve.score(0.1, EnergyDirection::Build) > curve.score(-0.05, EnergyDirection::Build));
    }

    #[test]
    fn test_drop_mirrors_build() {
        let curve = EnergyCurve::default();
        for delta in [-0.4, -0.2, -0.15, -0.05, 0.0, 0.05, 0.2] {
            assert!(approx(
                curve.score(delta, EnergyDirection::Drop),
                curve.score(-delta, EnergyDirection::Build)
            ));
        }
        assert!(approx(score(0.7, 0.55, EnergyDirection::Drop), 1.0));
    }

    #[test]
    fn test_maintain() {
        assert_eq!(score(0.4, 0.4, EnergyDirection::Maintain), 1.0);
        assert!(approx(score(0.4, 0.55, EnergyDirection::Maintain), 0.5));
        assert!(approx(score(0.4, 0.25, EnergyDirection::Maintain), 0.5));
        assert_eq!(score(0.2, 0.6, EnergyDirection::Maintain), 0.0);
    }

    #[test]
    fn test_missing_energy_is_neutral() {
        let curve = EnergyCurve::default();
        for direction in [EnergyDirection::Build, EnergyDirection::Maintain, EnergyDirection::Drop] {
            assert_eq!(energy_score(None, Some(0.5), direction, &curve), NEUTRAL_SCORE);
            assert_eq!(energy_score(Some(0.5), None, direction, &curve), NEUTRAL_SCORE);
        }
    }
}
