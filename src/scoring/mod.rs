//! # Compatibility Scoring
//!
//! Pure scoring of a candidate track against the currently playing one. Each
//! axis produces a sub-score in [0, 1]; the [`CompatibilityScorer`] combines
//! them with configurable weights into a composite score.
//!
//! ## Axes
//!
//! - **Tempo**: relative BPM deviation inside a tolerance window, with half-time and
//!   double-time candidates matched against the source tempo
//! - **Harmony**: Camelot-wheel relation between the two keys
//! - **Energy**: fit of the energy change to the requested direction
//! - **Similarity**: cosine similarity of audio embeddings
//!
//! A feature missing on either side never fails scoring: that axis falls back to
//! [`NEUTRAL_SCORE`].
//!
//! ```rust
//! use mixwise::features::{CamelotKey, EnergyDirection, TrackFeatures};
//! use mixwise::scoring::CompatibilityScorer;
//!
//! let scorer = CompatibilityScorer::default();
//! let playing = TrackFeatures::unanalyzed("a").with_bpm(174.0).with_key(CamelotKey::parse("8A").unwrap());
//! let next = TrackFeatures::unanalyzed("b").with_bpm(87.0).with_key(CamelotKey::parse("9A").unwrap());
//!
//! let scored = scorer.score(&playing, &next, EnergyDirection::Maintain);
//! assert_eq!(scored.bpm_score, 1.0);
//! assert_eq!(scored.energy_score, 0.5);
//! ```

pub mod energy;
pub mod harmony;
pub mod scorer;
pub mod similarity;
pub mod tempo;

pub use energy::{energy_score, EnergyCurve};
pub use harmony::{key_score, HarmonicRelation};
pub use scorer::{CompatibilityScorer, ScoreWeights, ScoredCandidate};
pub use similarity::{cosine_similarity, embedding_score, similarity_score};
pub use tempo::{bpm_score, tempo_deviation, BpmRange, BpmWindow, TempoWindow};

/// Sub-score used when a feature is missing on either side
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Score an axis only when both tracks carry the feature, otherwise return [`NEUTRAL_SCORE`]
///
/// Results are clamped to [0, 1]; a NaN result is treated as neutral.
pub(crate) fn score_pair<A, B>(
    source: Option<A>,
    candidate: Option<B>,
    score: impl FnOnce(A, B) -> f64,
) -> f64 {
    match (source, candidate) {
        (Some(source), Some(candidate)) => {
            let value = score(source, candidate);
            if value.is_nan() {
                NEUTRAL_SCORE
            } else {
                value.clamp(0.0, 1.0)
            }
        }
        _ => NEUTRAL_SCORE,
    }
}
