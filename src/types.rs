//! Core data types for songprobe

use std::path::{Path, PathBuf};

/// Audio containers the probe understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
}

impl AudioFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "ogg" => Some(AudioFormat::Ogg),
            _ => None,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Check if a path has a supported extension
    pub fn is_supported_path(path: &Path) -> bool {
        Self::from_path(path).is_some()
    }
}

/// Probed duration for a single file.
/// Serialized through `export::json::TrackJson`, which owns the wire shape.
#[derive(Debug, Clone)]
pub struct TrackDuration {
    pub path: PathBuf,
    /// Playback duration in seconds; 0.0 means it could not be determined
    pub seconds: f64,
    /// "M:SS" rendering of `seconds` ("0:00" when unknown)
    pub display: String,
}
