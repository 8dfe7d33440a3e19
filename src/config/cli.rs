//! CLI argument parsing and configuration

use clap::Parser;
use std::path::PathBuf;

/// songprobe - batch audio duration probing
///
/// Scans a path for MP3/WAV/OGG files, determines each file's playback
/// duration directly from its container and frame headers, and writes a
/// JSON duration report.
#[derive(Parser, Debug)]
#[command(name = "songprobe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Input path (file or directory)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output path for the JSON report
    #[arg(short, long, value_name = "FILE", default_value = "durations.json")]
    pub output: PathBuf,

    /// Number of worker threads (defaults to CPU count - 1)
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Scan subdirectories recursively
    #[arg(short, long, default_value = "true")]
    pub recursive: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bar)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Dry run - list files that would be probed without reading them
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}
