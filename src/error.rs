//! Error types for the leaderboard pipeline
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for fatal pipeline scenarios
///
/// Per-character API failures are deliberately NOT represented here: they are
/// recovered locally and surface as `ErrorRecord`s in the rating report.
#[derive(Debug, thiserror::Error)]
pub enum HonorRollError {
    #[error("Missing credential environment variable: {name}")]
    MissingCredential { name: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Token request failed ({status}): {body}")]
    AuthenticationFailed { status: u16, body: String },

    #[error("Character directory empty or invalid: {path}")]
    EmptyDirectory { path: String },

    #[error("State storage error: {message}")]
    StateStorageError { message: String },

    #[error("Failed to write artifact {path}: {message}")]
    ArtifactWriteError { path: String, message: String },
}
