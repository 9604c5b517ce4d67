//! webp-optimize entry point
//!
//! Resizes and recompresses every WebP image under a directory.

use clap::Parser;
use siteprobe::optimize::{optimize_directory, OptimizeOptions, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Optimize WebP images for web performance
#[derive(Parser, Debug)]
#[command(name = "webp-optimize")]
#[command(version = "1.0.0")]
#[command(about = "Optimize WebP images for web performance", long_about = None)]
struct Cli {
    /// Directory to scan for WebP images
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Maximum width in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    max_width: u32,

    /// WebP quality 1-100
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let options = OptimizeOptions {
        max_width: cli.max_width,
        quality: cli.quality,
        dry_run: cli.dry_run,
    };

    match optimize_directory(&cli.directory, &options) {
        Ok(summary) => {
            tracing::debug!("Finished: {:?}", summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("siteprobe=warn"),
            1 => EnvFilter::new("siteprobe=info,warn"),
            2 => EnvFilter::new("siteprobe=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
