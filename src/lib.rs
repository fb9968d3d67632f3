//! # Mixwise
//!
//! Next-track recommendations for DJ sets, driven by tempo, harmonic key,
//! energy flow and audio similarity.
//!
//! This library scores every track in a library against the currently playing
//! one and returns a ranked, explainable list of candidates. Tracks that were
//! never analyzed still take part: missing features score neutral and the
//! response is flagged as degraded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mixwise::{
//!     config::Config,
//!     features::EnergyDirection,
//!     library::InMemoryLibrary,
//!     recommend::{CandidateRanker, RecommendationRequest},
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_file("mixwise.toml")?;
//!     let library = InMemoryLibrary::from_json_file("library.json")?;
//!     let ranker = CandidateRanker::new(library, &config)?;
//!
//!     let request = RecommendationRequest::new("track-042")
//!         .with_direction(EnergyDirection::Build)
//!         .harmonic_only()
//!         .with_limit(5);
//!
//!     for candidate in ranker.recommend(&request)?.recommendations {
//!         println!("{} {:.3}", candidate.track_id, candidate.composite_score);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`features`] - Track feature projections and Camelot keys
//! - [`scoring`] - Per-axis sub-scores and the weighted composite
//! - [`library`] - The store interface and an in-memory snapshot
//! - [`recommend`] - Candidate pool construction and ranking
//! - [`config`] - Configuration management
//!
//! ## Custom Stores
//!
//! Any backing store can feed the ranker by implementing [`LibraryStore`]:
//!
//! ```rust,no_run
//! use mixwise::features::TrackFeatures;
//! use mixwise::library::{CandidateFilter, LibraryStore};
//! use mixwise::Result;
//!
//! struct Catalog;
//!
//! impl LibraryStore for Catalog {
//!     fn get_track_features(&self, id: &str) -> Result<Option<TrackFeatures>> {
//!         // Look the track up in your database
//!         Ok(None)
//!     }
//!
//!     fn get_candidate_pool(&self, filter: &CandidateFilter) -> Result<Vec<TrackFeatures>> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod library;
pub mod recommend;
pub mod scoring;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{RecommendError, Result},
    features::{CamelotKey, EnergyDirection, TrackFeatures},
    library::{InMemoryLibrary, LibraryStore},
    recommend::{CandidateRanker, RecommendationRequest, RecommendationResponse},
    scoring::{CompatibilityScorer, ScoredCandidate},
};
