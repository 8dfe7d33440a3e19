//! Duration probing from raw container and frame headers
//!
//! Each parser reads only the minimal header structures it needs - no
//! external decoder is involved. Parsers own their file handle for the scope
//! of one call and hold no state between calls, so probing different files
//! from multiple threads is safe.

pub mod mp3;
pub mod ogg;
pub mod wav;

use crate::error::{Result, SongprobeError};
use crate::types::AudioFormat;
use std::path::Path;
use tracing::debug;

/// Determine the playback duration of an audio file, in seconds.
///
/// Dispatches on the (case-insensitive) file extension: `mp3`, `wav`, `ogg`.
/// Any failure - unsupported extension, unreadable path, malformed or
/// truncated headers - degrades to the `0.0` sentinel rather than an error,
/// so an upload pipeline is never blocked by a bad media file. The returned
/// value is always finite and non-negative.
pub fn duration_seconds(path: &Path) -> f64 {
    match probe(path) {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => seconds,
        Ok(seconds) => {
            debug!(
                "Discarding degenerate duration {} for {}",
                seconds,
                path.display()
            );
            0.0
        }
        Err(e) => {
            debug!("Could not determine duration of {}: {}", path.display(), e);
            0.0
        }
    }
}

/// Probe with a typed error, for callers that want to know why a file could
/// not be measured. Same parse behavior as [`duration_seconds`].
pub fn probe(path: &Path) -> Result<f64> {
    let format = AudioFormat::from_path(path).ok_or_else(|| SongprobeError::UnsupportedFormat {
        path: path.to_path_buf(),
        format: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string(),
    })?;

    match format {
        AudioFormat::Mp3 => mp3::duration(path),
        AudioFormat::Wav => wav::duration(path),
        AudioFormat::Ogg => ogg::duration(path),
    }
}
