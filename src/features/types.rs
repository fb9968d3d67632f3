use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::key::CamelotKey;

/// Feature projection of a library track, as consumed by the scorer
///
/// Every analysis field is optional: unanalyzed tracks carry `None` everywhere and
/// score neutrally rather than failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackFeatures {
    /// Opaque unique track identifier
    pub id: String,

    /// Tempo in beats per minute (always positive when present)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<f64>,

    /// Musical key on the Camelot wheel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<CamelotKey>,

    /// Perceived intensity in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,

    /// Fixed-length audio embedding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl TrackFeatures {
    /// Features for a track with no analysis data
    pub fn unanalyzed<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            bpm: None,
            key: None,
            energy: None,
            embedding: None,
        }
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    pub fn with_key(mut self, key: CamelotKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Features that are absent on this track
    pub fn missing_features(&self) -> Vec<Feature> {
        let mut missing = Vec::new();
        if self.bpm.is_none() {
            missing.push(Feature::Bpm);
        }
        if self.key.is_none() {
            missing.push(Feature::Key);
        }
        if self.energy.is_none() {
            missing.push(Feature::Energy);
        }
        if self.embedding.is_none() {
            missing.push(Feature::Embedding);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.bpm.is_some() && self.key.is_some() && self.energy.is_some() && self.embedding.is_some()
    }
}

/// A scored feature axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Bpm,
    Key,
    Energy,
    Embedding,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::Bpm => "bpm",
            Feature::Key => "key",
            Feature::Energy => "energy",
            Feature::Embedding => "embedding",
        };
        f.write_str(name)
    }
}

/// Intended energy trajectory for the next track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyDirection {
    /// Raise the intensity
    Build,
    /// Keep the intensity steady
    #[default]
    Maintain,
    /// Bring the intensity down
    Drop,
}

impl fmt::Display for EnergyDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EnergyDirection::Build => "build",
            EnergyDirection::Maintain => "maintain",
            EnergyDirection::Drop => "drop",
        };
        f.write_str(name)
    }
}

impl FromStr for EnergyDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" | "up" => Ok(EnergyDirection::Build),
            "maintain" | "steady" => Ok(EnergyDirection::Maintain),
            "drop" | "down" => Ok(EnergyDirection::Drop),
            other => Err(format!(
                "unknown energy direction '{}' (expected build, maintain or drop)",
                other
            )),
        }
    }
}
