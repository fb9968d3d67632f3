//! # Library Store
//!
//! The narrow interface the ranker uses to read track features, plus an
//! immutable in-memory snapshot implementation loaded from JSON.
//!
//! Any backing store (SQL, remote catalog, ...) can implement [`LibraryStore`].
//! Stores may apply [`CandidateFilter`] coarsely (an index lookup, a SQL `WHERE`);
//! the ranker re-checks [`CandidateFilter::matches`] on the returned pool.

pub mod memory;
pub mod record;

use std::collections::HashSet;

pub use memory::InMemoryLibrary;
pub use record::TrackRecord;

use crate::{
    error::Result,
    features::{CamelotKey, TrackFeatures},
    scoring::BpmWindow,
};

/// Read-only access to library track features
///
/// Implementations must hand out a consistent snapshot for the duration of one call.
pub trait LibraryStore: Send + Sync {
    /// Fetch a single track's features, `None` when the id is unknown
    fn get_track_features(&self, id: &str) -> Result<Option<TrackFeatures>>;

    /// Fetch every track passing `filter`
    fn get_candidate_pool(&self, filter: &CandidateFilter) -> Result<Vec<TrackFeatures>>;
}

impl<T: LibraryStore + ?Sized> LibraryStore for &T {
    fn get_track_features(&self, id: &str) -> Result<Option<TrackFeatures>> {
        (**self).get_track_features(id)
    }

    fn get_candidate_pool(&self, filter: &CandidateFilter) -> Result<Vec<TrackFeatures>> {
        (**self).get_candidate_pool(filter)
    }
}

/// Key constraint on the candidate pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyFilter {
    #[default]
    Any,
    /// Only this exact key
    Exact(CamelotKey),
    /// Keys within one harmonic step of this key
    Harmonic(CamelotKey),
}

impl KeyFilter {
    /// Candidates with an unknown key never pass a key constraint
    pub fn matches(&self, key: Option<CamelotKey>) -> bool {
        match self {
            KeyFilter::Any => true,
            KeyFilter::Exact(wanted) => key == Some(*wanted),
            KeyFilter::Harmonic(source) => key.is_some_and(|key| source.is_harmonic_match(&key)),
        }
    }
}

/// Coarse pre-filter for the candidate pool
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// Track ids never returned (the source track, already played tracks)
    pub exclude_ids: HashSet<String>,

    pub key_filter: KeyFilter,

    /// Tempo window; candidates with unknown BPM are kept
    pub bpm_window: Option<BpmWindow>,
}

impl CandidateFilter {
    pub fn excluding<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude_ids: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_key_filter(mut self, key_filter: KeyFilter) -> Self {
        self.key_filter = key_filter;
        self
    }

    pub fn with_bpm_window(mut self, window: BpmWindow) -> Self {
        self.bpm_window = Some(window);
        self
    }

    pub fn matches(&self, track: &TrackFeatures) -> bool {
        if self.exclude_ids.contains(&track.id) {
            return false;
        }

        if !self.key_filter.matches(track.key) {
            return false;
        }

        match (&self.bpm_window, track.bpm) {
            (Some(window), Some(bpm)) => window.contains(bpm),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, bpm: Option<f64>, key: Option<&str>) -> TrackFeatures {
        TrackFeatures {
            id: id.to_string(),
            bpm,
            key: key.and_then(CamelotKey::parse),
            energy: None,
            embedding: None,
        }
    }

    #[test]
    fn test_exclusion() {
        let filter = CandidateFilter::excluding(["a", "b"]);
        assert!(!filter.matches(&track("a", None, None)));
        assert!(!filter.matches(&track("b", None, None)));
        assert!(filter.matches(&track("c", None, None)));
    }

    #[test]
    fn test_key_filters() {
        let source = CamelotKey::parse("8A").unwrap();

        let exact = KeyFilter::Exact(source);
        assert!(exact.matches(Some(source)));
        assert!(!exact.matches(CamelotKey::parse("8B")));
        assert!(!exact.matches(None));

        let harmonic = KeyFilter::Harmonic(source);
        for key in ["8A", "7A", "9A", "8B"] {
            assert!(harmonic.matches(CamelotKey::parse(key)), "{} rejected", key);
        }
        for key in ["9B", "10A", "2A"] {
            assert!(!harmonic.matches(CamelotKey::parse(key)), "{} accepted", key);
        }
        assert!(!harmonic.matches(None));

        assert!(KeyFilter::Any.matches(None));
    }

    #[test]
    fn test_bpm_window_keeps_unknown_tempo() {
        let filter = CandidateFilter::default().with_bpm_window(BpmWindow::new(128.0, 8.0, true));
        assert!(filter.matches(&track("a", Some(126.0), None)));
        assert!(filter.matches(&track("b", Some(64.0), None)));
        assert!(filter.matches(&track("c", None, None)));
        assert!(!filter.matches(&track("d", Some(100.0), None)));
    }
}
