//! Error types shared across the bilimux-core library.
//!
//! Most per-item problems are collected into the run report rather than
//! propagated, so these variants carry enough context to be meaningful
//! when printed long after the failing operation ran.

use thiserror::Error;

/// Custom error types for bilimux
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    PathError(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Missing title: {0}")]
    MissingTitle(String),

    #[error("Not enough input to merge: {0}")]
    InsufficientInput(String),

    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    #[error("Transcode failed: {0}")]
    TranscodeFailure(String),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("No numeric item directories found")]
    NoItemsFound,
}

/// Result type for bilimux-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;
