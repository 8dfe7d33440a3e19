//! JSON report export for interoperability with other tools

use crate::error::{Result, SongprobeError};
use crate::types::TrackDuration;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Top-level JSON output structure
#[derive(Debug, Serialize, Deserialize)]
pub struct DurationReport {
    /// Schema version for forward compatibility
    pub version: String,
    /// Report metadata
    pub metadata: ReportMetadata,
    /// Probed tracks
    pub tracks: Vec<TrackJson>,
}

/// Report metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// songprobe version that generated this file
    pub generator_version: String,
    /// Timestamp of export
    pub exported_at: String,
    /// Number of tracks
    pub track_count: usize,
}

/// JSON representation of a probed track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackJson {
    /// File path
    pub path: String,
    /// Duration in seconds; 0.0 means it could not be determined
    pub seconds: f64,
    /// "M:SS" rendering, "0:00" when unknown
    pub duration: String,
}

/// Write probed tracks to a JSON file
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
/// This prevents data corruption if the write is interrupted.
pub fn write_json(tracks: &[TrackDuration], output_path: &Path) -> Result<()> {
    // Write to temp file in same directory (ensures same filesystem for atomic rename)
    let temp_path = output_path.with_extension("json.tmp");

    let file = File::create(&temp_path).map_err(|e| SongprobeError::OutputError {
        path: output_path.to_path_buf(),
        reason: format!("Failed to create temp file: {}", e),
    })?;

    let writer = BufWriter::new(file);

    let output = DurationReport {
        version: SCHEMA_VERSION.to_string(),
        metadata: ReportMetadata {
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: chrono::Utc::now().to_rfc3339(),
            track_count: tracks.len(),
        },
        tracks: tracks.iter().map(track_to_json).collect(),
    };

    serde_json::to_writer_pretty(writer, &output).map_err(|e| {
        // Clean up temp file on error
        let _ = std::fs::remove_file(&temp_path);
        SongprobeError::OutputError {
            path: output_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    // Atomic rename: either succeeds completely or fails without modifying target
    std::fs::rename(&temp_path, output_path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        SongprobeError::OutputError {
            path: output_path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    info!("Wrote {} tracks to {}", tracks.len(), output_path.display());

    Ok(())
}

fn track_to_json(track: &TrackDuration) -> TrackJson {
    TrackJson {
        path: track.path.to_string_lossy().to_string(),
        seconds: track.seconds,
        duration: track.display.clone(),
    }
}
