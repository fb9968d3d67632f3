use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::features::{CamelotKey, TrackFeatures};

/// A stored library track, as written by the import and analysis pipeline
///
/// Only `id` is required. Analysis values are trusted only when `is_analyzed` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackRecord {
    pub id: String,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub genre: Option<String>,

    pub bpm: Option<f64>,
    /// Key in any supported notation; normalized to Camelot on projection
    pub key: Option<String>,
    pub energy: Option<f64>,
    pub embedding: Option<Vec<f32>>,

    // Carried for the presentation layer, not scored
    pub danceability: Option<f64>,
    pub valence: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub speechiness: Option<f64>,
    pub liveness: Option<f64>,
    pub loudness: Option<f64>,

    pub is_analyzed: bool,
}

impl TrackRecord {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Project the record into the features the scorer consumes
    ///
    /// Unanalyzed records yield no features at all. Values outside the data model
    /// (non-positive tempo, energy outside [0, 1], unknown key notation, empty or
    /// non-finite embeddings) are dropped.
    pub fn features(&self) -> TrackFeatures {
        if !self.is_analyzed {
            return TrackFeatures::unanalyzed(self.id.clone());
        }

        let key = self.key.as_deref().and_then(|raw| {
            let parsed = CamelotKey::parse(raw);
            if parsed.is_none() {
                debug!("Track {}: ignoring unrecognized key '{}'", self.id, raw);
            }
            parsed
        });

        TrackFeatures {
            id: self.id.clone(),
            bpm: self.bpm.filter(|bpm| bpm.is_finite() && *bpm > 0.0),
            key,
            energy: self.energy.filter(|energy| (0.0..=1.0).contains(energy)),
            embedding: self
                .embedding
                .clone()
                .filter(|values| !values.is_empty() && values.iter().all(|v| v.is_finite())),
        }
    }
}
