//! # Track Features
//!
//! Read-only feature projections consumed by the scorer: tempo, Camelot key,
//! energy and an optional audio embedding, plus the energy direction a DJ
//! asks for when picking the next track.
//!
//! Keys are normalized to Camelot notation on the way in:
//!
//! ```rust
//! use mixwise::features::CamelotKey;
//!
//! let key = CamelotKey::parse("F# minor").unwrap();
//! assert_eq!(key.to_string(), "11A");
//! ```

pub mod key;
pub mod types;

pub use key::{CamelotKey, Mode};
pub use types::{EnergyDirection, Feature, TrackFeatures};
