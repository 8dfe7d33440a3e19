//! Pipeline orchestration
//!
//! Coordinates file discovery, parallel duration probing, and report export.
//! Probing is pure per-file work with no shared state, so it maps directly
//! onto a rayon parallel iterator.

use crate::config::Settings;
use crate::discovery::{self, DiscoveredFile};
use crate::display;
use crate::error::{Result, SongprobeError};
use crate::export;
use crate::probe;
use crate::types::TrackDuration;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Pipeline result summary
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub total_files: usize,
    /// Files with a determined, non-zero duration
    pub probed: usize,
    /// Files that degraded to the 0.0 sentinel
    pub unknown: usize,
}

/// Run the full probing pipeline
pub fn run(settings: &Settings) -> Result<PipelineResult> {
    let pipeline_start = Instant::now();

    configure_thread_pool(settings.threads)?;

    // Phase 1: Discovery
    info!("Scanning for audio files...");
    let files = discovery::scan(&settings.input, settings.recursive)?;

    if files.is_empty() {
        return Ok(PipelineResult::default());
    }

    // Dry run mode - show files and exit
    if settings.dry_run {
        return run_dry_run(&files, settings);
    }

    info!("Probing {} files", files.len());

    // Phase 2: Parallel probing
    let progress = if settings.show_progress {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("[{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Some(bar)
    } else {
        None
    };

    let tracks: Result<Vec<TrackDuration>> = files
        .par_iter()
        .map(|file| {
            // Recoverable probe failures become sentinel entries and the
            // batch continues; anything else aborts it
            let seconds = match probe::probe(&file.path) {
                Ok(seconds) if seconds.is_finite() && seconds > 0.0 => seconds,
                Ok(_) => 0.0,
                Err(e) if e.is_recoverable() => {
                    debug!("No duration determined for {}: {}", file.path.display(), e);
                    0.0
                }
                Err(e) => return Err(e),
            };
            if let Some(bar) = &progress {
                bar.inc(1);
            }
            Ok(TrackDuration {
                path: file.path.clone(),
                seconds,
                display: display::format_duration(seconds),
            })
        })
        .collect();
    let tracks = tracks?;

    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }

    let unknown = tracks.iter().filter(|t| t.seconds <= 0.0).count();
    let probed = tracks.len() - unknown;

    // Phase 3: Export
    export::write_json(&tracks, &settings.output)?;

    info!(
        "Probed {} files in {:.2}s",
        tracks.len(),
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(PipelineResult {
        total_files: tracks.len(),
        probed,
        unknown,
    })
}

/// Dry run mode - show files that would be probed without reading them
fn run_dry_run(files: &[DiscoveredFile], settings: &Settings) -> Result<PipelineResult> {
    println!();
    println!("=== DRY RUN MODE ===");
    println!();

    for file in files {
        println!("  {} ({} bytes)", file.path.display(), file.size_bytes);
    }

    // Format breakdown
    let mut by_format: HashMap<String, usize> = HashMap::new();
    for file in files {
        *by_format.entry(format!("{:?}", file.format)).or_default() += 1;
    }

    println!();
    println!("Would probe {} files:", files.len());
    let mut formats: Vec<_> = by_format.iter().collect();
    formats.sort_by(|a, b| b.1.cmp(a.1));
    for (format, count) in formats {
        println!("  {} {}", count, format);
    }
    println!();
    println!("Would create: {}", settings.output.display());
    println!();

    Ok(PipelineResult {
        total_files: files.len(),
        probed: 0,
        unknown: 0,
    })
}

/// Configure the Rayon thread pool
fn configure_thread_pool(num_threads: usize) -> Result<()> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        Ok(()) => {
            debug!("Configured thread pool with {} threads", num_threads);
        }
        Err(e) => {
            // If the pool is already initialized (e.g., in tests), that's OK
            if e.to_string().contains("already been initialized") {
                debug!("Thread pool already initialized, using existing pool");
            } else {
                return Err(SongprobeError::ConfigError(format!(
                    "Failed to configure thread pool: {}",
                    e
                )));
            }
        }
    }
    Ok(())
}
