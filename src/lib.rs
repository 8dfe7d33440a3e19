//! songprobe - Audio Duration Probing from Raw Headers
//!
//! Determines the playback duration of MP3, WAV and Ogg/Vorbis files by
//! reading and interpreting container and frame headers directly, without
//! invoking an external decoder. Built for upload pipelines: a malformed or
//! truncated file never produces an error, only the 0.0 "unknown" sentinel.
//!
//! # Architecture
//!
//! - `probe`: extension dispatch and the per-format header parsers
//! - `display`: "M:SS" rendering of probed durations
//! - `discovery`: file scanning for the batch CLI
//! - `pipeline`: parallel probing orchestration
//! - `export`: JSON duration report
//! - `config`: CLI argument parsing and runtime settings
//!
//! # Example
//!
//! ```no_run
//! use songprobe::{duration_seconds, format_duration};
//! use std::path::Path;
//!
//! let seconds = duration_seconds(Path::new("uploads/song.mp3"));
//! println!("duration: {}", format_duration(seconds));
//! ```

pub mod config;
pub mod discovery;
pub mod display;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod probe;
pub mod types;

// Re-export the two-function library boundary at the crate root
pub use display::format_duration;
pub use error::{Result, SongprobeError};
pub use probe::duration_seconds;
pub use types::{AudioFormat, TrackDuration};
