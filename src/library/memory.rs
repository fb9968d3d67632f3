use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CandidateFilter, LibraryStore, TrackRecord};
use crate::{
    error::{LibraryError, Result},
    features::TrackFeatures,
};

/// Immutable in-memory library snapshot
///
/// Cloning is cheap and shares the snapshot, so concurrent ranking calls never
/// observe a partially updated library.
#[derive(Debug, Clone)]
pub struct InMemoryLibrary {
    tracks: Arc<[TrackFeatures]>,
    index: Arc<HashMap<String, usize>>,
}

impl InMemoryLibrary {
    /// Build a snapshot from already projected features
    pub fn from_features(features: Vec<TrackFeatures>) -> Result<Self> {
        let mut index = HashMap::with_capacity(features.len());
        for (position, track) in features.iter().enumerate() {
            if index.insert(track.id.clone(), position).is_some() {
                return Err(LibraryError::DuplicateTrack { id: track.id.clone() }.into());
            }
        }

        Ok(Self {
            tracks: features.into(),
            index: Arc::new(index),
        })
    }

    /// Build a snapshot from stored records, projecting each to its features
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = TrackRecord>,
    {
        let features: Vec<TrackFeatures> = records.into_iter().map(|record| record.features()).collect();
        Self::from_features(features)
    }

    /// Load a JSON array of [`TrackRecord`]s
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading library snapshot from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| LibraryError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let records: Vec<TrackRecord> = serde_json::from_str(&content).map_err(|e| LibraryError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let unanalyzed = records.iter().filter(|record| !record.is_analyzed).count();
        let library = Self::from_records(records)?;

        if unanalyzed > 0 {
            warn!("{} of {} tracks are unanalyzed and will score neutral", unanalyzed, library.len());
        }
        info!("Loaded {} tracks from {:?}", library.len(), path);
        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Every track in the snapshot, in load order
    pub fn tracks(&self) -> &[TrackFeatures] {
        &self.tracks
    }
}

impl LibraryStore for InMemoryLibrary {
    fn get_track_features(&self, id: &str) -> Result<Option<TrackFeatures>> {
        Ok(self.index.get(id).map(|&position| self.tracks[position].clone()))
    }

    fn get_candidate_pool(&self, filter: &CandidateFilter) -> Result<Vec<TrackFeatures>> {
        Ok(self
            .tracks
            .iter()
            .filter(|track| filter.matches(track))
            .cloned()
            .collect())
    }
}
