//! WebP batch optimizer
//!
//! Walks a directory tree, caps image widths and re-encodes every `.webp`
//! file in place. Per-file failures are reported and skipped.
//!
//! # Example
//!
//! ```no_run
//! use siteprobe::optimize::{optimize_directory, OptimizeOptions};
//! use std::path::Path;
//!
//! let options = OptimizeOptions { dry_run: true, ..OptimizeOptions::default() };
//! let summary = optimize_directory(Path::new("public/images"), &options).unwrap();
//! println!("{} files", summary.files_processed);
//! ```

mod scan;
mod summary;
mod transcode;

pub use scan::find_webp_files;
pub use summary::{
    format_outcome, format_size, print_file_report, print_header, print_summary, OptimizeSummary,
};
pub use transcode::{encode_webp, estimate_size, optimize_image, target_dimensions, ImageOutcome};

use crate::OptimizeError;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_WIDTH: u32 = 2800;
pub const DEFAULT_QUALITY: u8 = 85;

/// Optimizer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Wider images are scaled down to this width
    pub max_width: u32,
    /// WebP quality, 1 to 100
    pub quality: u8,
    /// Report estimates without writing anything
    pub dry_run: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            quality: DEFAULT_QUALITY,
            dry_run: false,
        }
    }
}

impl OptimizeOptions {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if !(1..=100).contains(&self.quality) {
            return Err(OptimizeError::InvalidQuality(self.quality));
        }
        if self.max_width == 0 {
            return Err(OptimizeError::InvalidMaxWidth);
        }
        Ok(())
    }
}

/// Outcome for one file, keyed by its path relative to the scanned directory
#[derive(Debug)]
pub struct FileReport {
    pub relative: PathBuf,
    pub result: Result<ImageOutcome, OptimizeError>,
}

/// Optimizes every WebP file under `dir`, printing a line per file
///
/// # Returns
///
/// * `Ok(OptimizeSummary)` - Totals over all files, including failed ones
/// * `Err(OptimizeError)` - `dir` is not a directory or the options are invalid
pub fn optimize_directory(dir: &Path, options: &OptimizeOptions) -> Result<OptimizeSummary, OptimizeError> {
    if !dir.is_dir() {
        return Err(OptimizeError::InvalidDirectory(dir.to_path_buf()));
    }
    options.validate()?;

    let files = find_webp_files(dir);
    if files.is_empty() {
        println!("No WebP files found.");
        return Ok(OptimizeSummary {
            dry_run: options.dry_run,
            ..OptimizeSummary::default()
        });
    }

    let display_dir = dir
        .canonicalize()
        .unwrap_or_else(|_| dir.to_path_buf())
        .display()
        .to_string();
    print_header(
        &display_dir,
        options.max_width,
        options.quality,
        files.len(),
        options.dry_run,
    );

    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let relative = path.strip_prefix(dir).unwrap_or(path.as_path()).to_path_buf();
        let result = optimize_image(&path, options);
        if let Err(e) = &result {
            tracing::warn!("Failed to optimize {}: {}", path.display(), e);
        }

        let report = FileReport { relative, result };
        print_file_report(&report);
        reports.push(report);
    }

    let summary = OptimizeSummary::from_reports(&reports, options.dry_run);
    print_summary(&summary);
    Ok(summary)
}
