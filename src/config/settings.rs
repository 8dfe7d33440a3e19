//! Runtime configuration settings

use std::path::PathBuf;

/// Runtime settings for the probing pipeline
#[derive(Debug, Clone)]
pub struct Settings {
    /// Input path (file or directory)
    pub input: PathBuf,
    /// Output path for the JSON report
    pub output: PathBuf,
    /// Number of probe worker threads
    pub threads: usize,
    /// Scan recursively
    pub recursive: bool,
    /// Show progress bar
    pub show_progress: bool,
    /// Dry run mode - show files without probing
    pub dry_run: bool,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        let default_threads = num_cpus::get().saturating_sub(1).max(1);

        Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            threads: cli.threads.unwrap_or(default_threads),
            recursive: cli.recursive,
            show_progress: !cli.quiet,
            dry_run: cli.dry_run,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("durations.json"),
            threads: num_cpus::get().saturating_sub(1).max(1),
            recursive: true,
            show_progress: true,
            dry_run: false,
        }
    }
}
