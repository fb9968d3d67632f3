use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    scoring::{EnergyCurve, ScoreWeights},
};

/// Main configuration for mixwise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Compatibility scoring settings
    pub scoring: ScoringConfig,

    /// Candidate ranking settings
    pub ranking: RankingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.scoring.validate()?;
        self.ranking.validate()?;
        Ok(())
    }
}

/// Compatibility scorer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of each axis in the composite score
    pub weights: ScoreWeights,

    /// BPM tolerance window in percent of the source tempo
    pub bpm_tolerance_percent: f64,

    /// Energy-flow curve breakpoints
    pub energy: EnergyCurve,

    /// Also compare candidates at half and double their tempo
    pub half_double_time: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            bpm_tolerance_percent: 8.0,
            energy: EnergyCurve::default(),
            half_double_time: true,
        }
    }
}

impl ScoringConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        let weights = [
            ("scoring.weights.bpm", self.weights.bpm),
            ("scoring.weights.key", self.weights.key),
            ("scoring.weights.energy", self.weights.energy),
            ("scoring.weights.embedding", self.weights.embedding),
        ];
        for (key, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(invalid(key, weight));
            }
        }

        if self.weights.total() <= 0.0 {
            return Err(invalid("scoring.weights", self.weights.total()));
        }

        if !valid_tolerance(self.bpm_tolerance_percent) {
            return Err(invalid("scoring.bpm_tolerance_percent", self.bpm_tolerance_percent));
        }

        let curve = &self.energy;
        let ordered = curve.floor_delta < 0.0
            && 0.0 < curve.target_delta
            && curve.target_delta < curve.ceiling_delta;
        if !ordered || !curve.ceiling_delta.is_finite() || !curve.floor_delta.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "scoring.energy".to_string(),
                value: format!(
                    "{} < 0 < {} < {}",
                    curve.floor_delta, curve.target_delta, curve.ceiling_delta
                ),
            }.into());
        }

        if !(curve.maintain_window > 0.0 && curve.maintain_window.is_finite()) {
            return Err(invalid("scoring.energy.maintain_window", curve.maintain_window));
        }

        Ok(())
    }
}

/// Candidate ranker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Result count when a request does not set one
    pub default_limit: usize,

    /// Upper bound on the result count; larger requests are clamped
    pub max_limit: usize,

    /// Pool size at which candidates are scored in parallel
    pub parallel_threshold: usize,

    /// Number of worker threads for parallel scoring
    pub scoring_threads: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 500,
            parallel_threshold: 2048,
            scoring_threads: num_cpus::get(),
        }
    }
}

impl RankingConfig {
    fn validate(&self) -> Result<()> {
        if self.default_limit == 0 {
            return Err(invalid("ranking.default_limit", self.default_limit));
        }

        if self.max_limit < self.default_limit {
            return Err(ConfigError::InvalidValue {
                key: "ranking.limit_range".to_string(),
                value: format!("{}-{}", self.default_limit, self.max_limit)
            }.into());
        }

        if self.scoring_threads == 0 {
            return Err(invalid("ranking.scoring_threads", self.scoring_threads));
        }

        Ok(())
    }
}

/// A BPM tolerance must be a positive percentage no larger than 100
pub(crate) fn valid_tolerance(percent: f64) -> bool {
    percent.is_finite() && percent > 0.0 && percent <= 100.0
}

fn invalid<V: ToString>(key: &str, value: V) -> crate::error::RecommendError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}
