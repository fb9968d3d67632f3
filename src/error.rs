use thiserror::Error;

/// Main error type for the mixwise library
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed recommendation requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RequestError {
    #[error("limit must be at least 1, got {limit}")]
    InvalidLimit { limit: usize },

    #[error("same_key_only and harmonic_only cannot both be set")]
    ConflictingKeyFilters,

    #[error("BPM tolerance must be a positive percentage up to 100, got {value}")]
    InvalidTolerance { value: f64 },

    #[error("source_track_id must not be empty")]
    EmptySourceId,

    #[error("BPM must be a positive number, got {value}")]
    InvalidBpm { value: f64 },
}

/// Library store errors
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Track not found: {id}")]
    TrackNotFound { id: String },

    #[error("Failed to load library from {path}: {reason}")]
    LoadFailed { path: String, reason: String },

    #[error("Duplicate track id in library: {id}")]
    DuplicateTrack { id: String },

    #[error("Library store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using RecommendError
pub type Result<T> = std::result::Result<T, RecommendError>;

impl RecommendError {
    /// True when the source track id did not resolve in the library
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Library(LibraryError::TrackNotFound { .. }))
    }

    /// True for malformed requests (bad limit, conflicting filters, ...)
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Check if this error is recoverable (can be retried by the caller)
    ///
    /// Ranking itself is deterministic, so only store access can succeed on retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Library(LibraryError::Unavailable { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Library(LibraryError::TrackNotFound { id }) => {
                format!("Track '{}' is not in the library. Check the id or re-import the library.", id)
            }
            Self::Request(RequestError::ConflictingKeyFilters) => {
                "Choose either same-key or harmonic filtering, not both.".to_string()
            }
            Self::Request(RequestError::InvalidLimit { .. }) => {
                "Ask for at least one recommendation.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let not_found: RecommendError = LibraryError::TrackNotFound { id: "t1".into() }.into();
        assert!(not_found.is_not_found());
        assert!(!not_found.is_invalid_request());
        assert!(!not_found.is_recoverable());

        let invalid: RecommendError = RequestError::ConflictingKeyFilters.into();
        assert!(invalid.is_invalid_request());
        assert!(!invalid.is_recoverable());

        let unavailable: RecommendError = LibraryError::Unavailable { reason: "db down".into() }.into();
        assert!(unavailable.is_recoverable());
    }

    #[test]
    fn test_user_message_names_track() {
        let err: RecommendError = LibraryError::TrackNotFound { id: "abc".into() }.into();
        assert!(err.user_message().contains("abc"));
    }
}
