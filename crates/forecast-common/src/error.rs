//! Error types for the forecast grid loader.

use thiserror::Error;

/// Result type alias using LoaderError.
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Primary error type for loader operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    // === Provider Errors ===
    #[error("Failed to parse base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Forecast request failed: {0}")]
    Request(String),

    #[error("Error code {0} returned from forecast provider")]
    Status(u16),

    #[error("Failed to decode forecast response: {0}")]
    Decode(String),

    // === Record Errors ===
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification deciding how far an error may propagate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Aborts the run before traversal begins.
    Config,
    /// Skips one coordinate.
    Provider,
    /// Drops one entry.
    Validation,
    /// Drops one entry.
    Store,
}

impl LoaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoaderError::Config(_) => ErrorKind::Config,
            LoaderError::InvalidBaseUrl { .. }
            | LoaderError::Request(_)
            | LoaderError::Status(_)
            | LoaderError::Decode(_) => ErrorKind::Provider,
            LoaderError::Validation(_) => ErrorKind::Validation,
            LoaderError::Store(_) | LoaderError::Serialization(_) => ErrorKind::Store,
        }
    }

    /// Only configuration problems stop the process.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Config
    }
}

impl From<serde_json::Error> for LoaderError {
    fn from(err: serde_json::Error) -> Self {
        LoaderError::Serialization(err.to_string())
    }
}

/// Structural problems in a single hourly forecast entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing hourly weather")]
    MissingWeather,

    #[error("missing hourly weather id")]
    MissingWeatherId,

    #[error("missing hourly weather main type")]
    MissingMainType,

    #[error("missing hourly weather type description")]
    MissingDescription,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_is_fatal() {
        assert!(LoaderError::Config("x".into()).is_fatal());
        assert!(!LoaderError::Status(500).is_fatal());
        assert!(!LoaderError::Store("down".into()).is_fatal());
        assert!(!LoaderError::from(ValidationError::MissingWeather).is_fatal());
    }

    #[test]
    fn test_kinds() {
        assert_eq!(LoaderError::Decode("bad".into()).kind(), ErrorKind::Provider);
        assert_eq!(
            LoaderError::Serialization("bad".into()).kind(),
            ErrorKind::Store
        );
        assert_eq!(
            LoaderError::from(ValidationError::MissingDescription).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = LoaderError::from(ValidationError::MissingWeatherId);
        assert_eq!(err.to_string(), "missing hourly weather id");
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            LoaderError::Status(401).to_string(),
            "Error code 401 returned from forecast provider"
        );
    }
}
