//! # Error Types
//!
//! Custom error types for ULG Checks using `thiserror`.

use thiserror::Error;

/// Main error type for ULG Checks
#[derive(Debug, Error)]
pub enum UlgCheckError {
    /// Malformed ULog data
    #[error("ULog decode error: {0}")]
    Decode(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but holds out-of-range values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Path passed to the harness is not a ULog file
    #[error("passed file is not a .ulg file: {0}")]
    NotULogFile(String),

    /// No log file path given on the command line
    #[error("no log file given, pass --filepath <FILE.ulg>")]
    MissingFilePath,

    /// Check name not present in the registry
    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    /// Columns combined row by row have different lengths
    #[error("Column length mismatch: {0}")]
    LengthMismatch(String),

    /// Requested topic has no subscription in the log
    #[error("Topic not found in log: {0}")]
    MissingTopic(String),

    /// Requested column is not part of the aligned table
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// Topic is subscribed but never published
    #[error("Topic has no samples: {0}")]
    EmptyTopic(String),

    /// Report serialization errors
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),
}

impl UlgCheckError {
    /// Errors that mean "this log cannot provide the requested data".
    ///
    /// A check hitting one of these is skipped rather than failed.
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            UlgCheckError::Decode(_)
                | UlgCheckError::Io(_)
                | UlgCheckError::MissingTopic(_)
                | UlgCheckError::MissingColumn(_)
                | UlgCheckError::EmptyTopic(_)
        )
    }
}

/// Result type alias for ULG Checks
pub type Result<T> = std::result::Result<T, UlgCheckError>;
