use serde::{Deserialize, Serialize};

use super::{bpm_score, cosine_similarity, energy_score, key_score, similarity_score, HarmonicRelation, NEUTRAL_SCORE};
use crate::{
    config::ScoringConfig,
    error::Result,
    features::{EnergyDirection, Feature, TrackFeatures},
};

/// Weights of each axis in the composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub bpm: f64,
    pub key: f64,
    pub energy: f64,
    pub embedding: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            bpm: 0.35,
            key: 0.30,
            energy: 0.20,
            embedding: 0.15,
        }
    }
}

impl ScoreWeights {
    pub fn total(&self) -> f64 {
        self.bpm + self.key + self.energy + self.embedding
    }

    /// Rescale so the weights sum to 1.0
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total <= 0.0 {
            return *self;
        }
        Self {
            bpm: self.bpm / total,
            key: self.key / total,
            energy: self.energy / total,
            embedding: self.embedding / total,
        }
    }
}

/// A candidate track with its composite score and per-axis sub-scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub track_id: String,
    pub composite_score: f64,
    pub bpm_score: f64,
    pub key_score: f64,
    pub energy_score: f64,
    pub embedding_score: f64,

    /// Camelot relation, when both keys are known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_relation: Option<HarmonicRelation>,

    /// Features absent on either track or not comparable, scored as neutral
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<Feature>,
}

impl ScoredCandidate {
    /// True when at least one axis fell back to the neutral score
    pub fn is_degraded(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Scores candidate tracks against a source track
///
/// Scoring is a pure function of the two feature sets and the direction, so one
/// scorer can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    config: ScoringConfig,
}

impl CompatibilityScorer {
    /// Create a scorer, validating the weights and curve breakpoints
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `candidate` as the track to play after `source`
    pub fn score(
        &self,
        source: &TrackFeatures,
        candidate: &TrackFeatures,
        direction: EnergyDirection,
    ) -> ScoredCandidate {
        self.score_with_tolerance(source, candidate, direction, self.config.bpm_tolerance_percent)
    }

    /// Like [`score`](Self::score), with a one-off BPM tolerance in percent
    pub fn score_with_tolerance(
        &self,
        source: &TrackFeatures,
        candidate: &TrackFeatures,
        direction: EnergyDirection,
        bpm_tolerance_percent: f64,
    ) -> ScoredCandidate {
        let bpm = bpm_score(
            source.bpm,
            candidate.bpm,
            bpm_tolerance_percent,
            self.config.half_double_time,
        );
        let key = key_score(source.key, candidate.key);
        let energy = energy_score(source.energy, candidate.energy, direction, &self.config.energy);

        // Both embeddings present but not comparable counts as missing
        let (embedding, embedding_unusable) =
            match (source.embedding.as_deref(), candidate.embedding.as_deref()) {
                (Some(from), Some(to)) => match cosine_similarity(from, to) {
                    Some(cosine) => (similarity_score(cosine), false),
                    None => (NEUTRAL_SCORE, true),
                },
                _ => (NEUTRAL_SCORE, false),
            };

        let key_relation = source
            .key
            .zip(candidate.key)
            .map(|(from, to)| HarmonicRelation::between(&from, &to));

        ScoredCandidate {
            track_id: candidate.id.clone(),
            composite_score: self.composite(bpm, key, energy, embedding),
            bpm_score: bpm,
            key_score: key,
            energy_score: energy,
            embedding_score: embedding,
            key_relation,
            missing: missing_on_either(source, candidate, embedding_unusable),
        }
    }

    /// Weighted sum of the sub-scores, clamped to [0, 1]
    pub fn composite(&self, bpm: f64, key: f64, energy: f64, embedding: f64) -> f64 {
        let weights = &self.config.weights;
        let total = weights.bpm * bpm
            + weights.key * key
            + weights.energy * energy
            + weights.embedding * embedding;
        total.clamp(0.0, 1.0)
    }
}

fn missing_on_either(
    source: &TrackFeatures,
    candidate: &TrackFeatures,
    embedding_unusable: bool,
) -> Vec<Feature> {
    let mut missing = source.missing_features();
    let unusable = embedding_unusable.then_some(Feature::Embedding);
    for feature in candidate.missing_features().into_iter().chain(unusable) {
        if !missing.contains(&feature) {
            missing.push(feature);
        }
    }
    missing.sort();
    missing
}
