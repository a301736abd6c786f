//! Error types for the Lantern analysis engine.

use thiserror::Error;

/// Main error type for Lantern operations.
///
/// The enum is `Clone` on purpose: a failed artifact computation is cached as
/// a terminal outcome for its cache key, and the stored error is replayed to
/// every later requester of that key within the run.
#[derive(Error, Debug, Clone)]
pub enum LanternError {
    /// An artifact's producer failed. Replayed to every requester of the
    /// same (artifact, fingerprint) key within the run.
    #[error("artifact `{artifact}` failed: {message}")]
    ArtifactFailed { artifact: String, message: String },

    /// Two artifacts were registered under the same name with different
    /// output types. This is a programming defect, not a runtime condition.
    #[error("artifact `{artifact}` resolved to a value of an unexpected type")]
    TypeMismatch { artifact: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LanternError {
    /// Wrap an upstream failure message under an artifact's name.
    pub fn artifact_failed(artifact: &str, message: impl Into<String>) -> Self {
        LanternError::ArtifactFailed {
            artifact: artifact.to_string(),
            message: message.into(),
        }
    }
}

/// Convenience Result type for Lantern operations.
pub type Result<T> = std::result::Result<T, LanternError>;

impl From<serde_json::Error> for LanternError {
    fn from(err: serde_json::Error) -> Self {
        LanternError::Serialization(err.to_string())
    }
}
