use serde::{Deserialize, Serialize};

use crate::{
    config::valid_tolerance,
    error::{RequestError, Result},
    features::{EnergyDirection, Feature},
    scoring::ScoredCandidate,
};

/// A request for next-track recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    /// The currently playing track
    pub source_track_id: String,

    /// Result count ceiling; the ranker's configured default when unset
    #[serde(default)]
    pub limit: Option<usize>,

    #[serde(default)]
    pub energy_direction: EnergyDirection,

    /// Overrides the scorer's BPM tolerance for this request only
    #[serde(default)]
    pub bpm_tolerance_percent: Option<f64>,

    /// Only candidates in exactly the source key
    #[serde(default)]
    pub same_key_only: bool,

    /// Only candidates within one harmonic step of the source key
    #[serde(default)]
    pub harmonic_only: bool,

    /// Only candidates inside the BPM tolerance window (direct, half or double time)
    #[serde(default)]
    pub bpm_window_only: bool,

    /// Tracks that must not be recommended, e.g. already played in this set
    #[serde(default)]
    pub exclude_track_ids: Vec<String>,
}

impl RecommendationRequest {
    pub fn new<S: Into<String>>(source_track_id: S) -> Self {
        Self {
            source_track_id: source_track_id.into(),
            limit: None,
            energy_direction: EnergyDirection::default(),
            bpm_tolerance_percent: None,
            same_key_only: false,
            harmonic_only: false,
            bpm_window_only: false,
            exclude_track_ids: Vec::new(),
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_direction(mut self, direction: EnergyDirection) -> Self {
        self.energy_direction = direction;
        self
    }

    pub fn with_bpm_tolerance(mut self, percent: f64) -> Self {
        self.bpm_tolerance_percent = Some(percent);
        self
    }

    pub fn same_key_only(mut self) -> Self {
        self.same_key_only = true;
        self
    }

    pub fn harmonic_only(mut self) -> Self {
        self.harmonic_only = true;
        self
    }

    pub fn bpm_window_only(mut self) -> Self {
        self.bpm_window_only = true;
        self
    }

    pub fn excluding<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_track_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Reject malformed requests before touching the library
    pub fn validate(&self) -> Result<()> {
        if self.source_track_id.trim().is_empty() {
            return Err(RequestError::EmptySourceId.into());
        }

        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(RequestError::InvalidLimit { limit }.into());
            }
        }

        if self.same_key_only && self.harmonic_only {
            return Err(RequestError::ConflictingKeyFilters.into());
        }

        if let Some(value) = self.bpm_tolerance_percent {
            if !valid_tolerance(value) {
                return Err(RequestError::InvalidTolerance { value }.into());
            }
        }

        Ok(())
    }
}

/// Non-fatal conditions reported alongside the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationWarning {
    /// The source track lacks features; those axes scored neutral for every candidate
    SourceIncomplete { missing: Vec<Feature> },

    /// `same_key_only` was requested but the source key is unknown
    SameKeyFilterSkipped,

    /// `harmonic_only` was requested but the source key is unknown
    HarmonicFilterSkipped,

    /// `bpm_window_only` was requested but the source BPM is unknown
    BpmWindowSkipped,

    /// The requested limit exceeded the configured maximum
    LimitClamped { requested: usize, applied: usize },
}

/// Ranked recommendations for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub source_track_id: String,

    /// Best first, at most `limit` entries
    pub recommendations: Vec<ScoredCandidate>,

    /// Set when the source or any scored candidate lacked a feature
    pub degraded: bool,

    /// Number of candidates scored before truncation
    pub pool_size: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<RecommendationWarning>,
}
