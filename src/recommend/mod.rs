//! # Recommendations
//!
//! Turns a library and a currently playing track into a ranked list of
//! candidates. [`CandidateRanker`] resolves the source track, builds the
//! candidate pool (excluding the source and any already played tracks, with
//! optional key and tempo constraints), scores every candidate and returns the
//! best `limit` of them.
//!
//! Ordering is total and deterministic: composite score, then BPM score, then
//! key score (all descending), then track id ascending. Parallel and sequential
//! scoring produce identical output.
//!
//! ```rust
//! use mixwise::features::{CamelotKey, EnergyDirection, TrackFeatures};
//! use mixwise::library::InMemoryLibrary;
//! use mixwise::recommend::{CandidateRanker, RecommendationRequest};
//! use mixwise::Config;
//!
//! # fn main() -> mixwise::Result<()> {
//! let track = |id: &str, bpm: f64, key: &str, energy: f64| {
//!     TrackFeatures::unanalyzed(id)
//!         .with_bpm(bpm)
//!         .with_key(CamelotKey::parse(key).unwrap())
//!         .with_energy(energy)
//! };
//!
//! let library = InMemoryLibrary::from_features(vec![
//!     track("playing", 128.0, "5A", 0.6),
//!     track("lift", 128.0, "5A", 0.75),
//!     track("dip", 128.0, "5A", 0.3),
//! ])?;
//!
//! let ranker = CandidateRanker::new(library, &Config::default())?;
//! let request = RecommendationRequest::new("playing").with_direction(EnergyDirection::Build);
//! let response = ranker.recommend(&request)?;
//!
//! assert_eq!(response.recommendations[0].track_id, "lift");
//! # Ok(())
//! # }
//! ```

pub mod ranker;
pub mod types;

pub use ranker::{rank_order, CandidateRanker};
pub use types::{RecommendationRequest, RecommendationResponse, RecommendationWarning};

pub use crate::scoring::ScoredCandidate;
