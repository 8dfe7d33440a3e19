//! Unified error types for songprobe
//!
//! Error strategy:
//! - Parse errors (missing sync, truncated headers): recoverable, and never
//!   visible through `duration_seconds`, which degrades them to the 0.0
//!   sentinel so a bad media file can never block a caller
//! - Per-file errors in the batch pipeline: recoverable, skip and continue
//! - System errors (report output, configuration): fatal, abort batch

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Supported audio formats for helpful error messages
pub const SUPPORTED_FORMATS: &str = "MP3, WAV, OGG";

/// Top-level error type for songprobe operations
#[derive(Debug, Error)]
pub enum SongprobeError {
    // =========================================================================
    // Recoverable errors - skip file, continue batch
    // =========================================================================
    #[error("Failed to parse '{path}': {reason}\n  Supported formats: {SUPPORTED_FORMATS}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Unsupported audio format for '{path}': {format}\n  Supported formats: {SUPPORTED_FORMATS}")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("File not found: '{0}'\n  Tip: Check the path exists and is accessible")]
    FileNotFound(PathBuf),

    // =========================================================================
    // Fatal errors - abort entire batch
    // =========================================================================
    #[error("Cannot write report to '{path}': {reason}\n  Tip: Check write permissions for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for songprobe operations
pub type Result<T> = std::result::Result<T, SongprobeError>;

impl SongprobeError {
    /// Parse failure tied to a specific file
    pub(crate) fn parse(path: &Path, reason: impl Into<String>) -> Self {
        SongprobeError::ParseError {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error is recoverable (should skip file, continue batch)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SongprobeError::ParseError { .. }
                | SongprobeError::UnsupportedFormat { .. }
                | SongprobeError::FileNotFound(_)
                | SongprobeError::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_file_errors_are_recoverable() {
        let path = PathBuf::from("/music/bad.mp3");
        assert!(SongprobeError::parse(&path, "truncated header").is_recoverable());
        assert!(SongprobeError::UnsupportedFormat {
            path: path.clone(),
            format: "aac".to_string(),
        }
        .is_recoverable());
        assert!(SongprobeError::FileNotFound(path).is_recoverable());
    }

    #[test]
    fn test_system_errors_abort_the_batch() {
        let output = SongprobeError::OutputError {
            path: PathBuf::from("durations.json"),
            reason: "permission denied".to_string(),
        };
        assert!(!output.is_recoverable());
        assert!(!SongprobeError::ConfigError("bad thread count".to_string()).is_recoverable());
    }
}
