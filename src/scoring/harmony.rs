use serde::{Deserialize, Serialize};

use super::score_pair;
use crate::features::CamelotKey;

/// How two keys sit relative to each other on the Camelot wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonicRelation {
    /// Same number, same mode
    Identical,
    /// Same number, opposite mode (relative major/minor)
    Relative,
    /// One step around the wheel, same mode
    Adjacent,
    /// One step around the wheel with a mode change
    Diagonal,
    /// Two steps around the wheel, same mode
    TwoSteps,
    /// Anything further
    Distant,
}

impl HarmonicRelation {
    pub fn between(source: &CamelotKey, candidate: &CamelotKey) -> Self {
        let same_mode = source.mode() == candidate.mode();
        match (source.step_distance(candidate), same_mode) {
            (0, true) => HarmonicRelation::Identical,
            (0, false) => HarmonicRelation::Relative,
            (1, true) => HarmonicRelation::Adjacent,
            (1, false) => HarmonicRelation::Diagonal,
            (2, true) => HarmonicRelation::TwoSteps,
            _ => HarmonicRelation::Distant,
        }
    }

    pub fn score(self) -> f64 {
        match self {
            HarmonicRelation::Identical => 1.0,
            HarmonicRelation::Relative => 0.9,
            HarmonicRelation::Adjacent => 0.8,
            HarmonicRelation::Diagonal => 0.6,
            HarmonicRelation::TwoSteps => 0.3,
            HarmonicRelation::Distant => 0.1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HarmonicRelation::Identical => "Perfect",
            HarmonicRelation::Relative => "Mood shift (A\u{2194}B)",
            HarmonicRelation::Adjacent => "Adjacent (+/-1)",
            HarmonicRelation::Diagonal => "Rough (+/-1, A\u{2194}B)",
            HarmonicRelation::TwoSteps => "Acceptable (+/-2)",
            HarmonicRelation::Distant => "Clash",
        }
    }
}

/// Harmonic compatibility of two keys
pub fn key_score(source: Option<CamelotKey>, candidate: Option<CamelotKey>) -> f64 {
    score_pair(source, candidate, |source, candidate| {
        HarmonicRelation::between(&source, &candidate).score()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::NEUTRAL_SCORE;

    fn key(s: &str) -> Option<CamelotKey> {
        CamelotKey::parse(s)
    }

    #[test]
    fn test_key_score_table() {
        assert_eq!(key_score(key("8A"), key("8A")), 1.0);
        assert_eq!(key_score(key("8A"), key("8B")), 0.9);
        assert_eq!(key_score(key("8A"), key("9A")), 0.8);
        assert_eq!(key_score(key("8A"), key("7A")), 0.8);
        assert_eq!(key_score(key("8A"), key("9B")), 0.6);
        assert_eq!(key_score(key("8A"), key("10A")), 0.3);
        assert_eq!(key_score(key("8A"), key("10B")), 0.1);
        assert_eq!(key_score(key("8A"), key("2A")), 0.1);
    }

    #[test]
    fn test_wheel_wraps_around() {
        assert_eq!(key_score(key("12B"), key("1B")), 0.8);
        assert_eq!(key_score(key("1A"), key("11A")), 0.3);
        assert_eq!(key_score(key("12A"), key("1B")), 0.6);
    }

    #[test]
    fn test_relation_is_symmetric() {
        let keys = ["1A", "4B", "7A", "12B", "6A"];
        for a in keys {
            for b in keys {
                assert_eq!(key_score(key(a), key(b)), key_score(key(b), key(a)));
            }
        }
    }

    #[test]
    fn test_missing_key_is_neutral() {
        assert_eq!(key_score(None, key("8A")), NEUTRAL_SCORE);
        assert_eq!(key_score(key("8A"), None), NEUTRAL_SCORE);
    }
}
