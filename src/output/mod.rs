//! Output module for audit reports
//!
//! This module handles:
//! - Rendering the Markdown audit report
//! - Deriving prioritized recommendations
//! - Writing the timestamped report file
//! - Printing the end-of-run console summary

mod markdown;
mod recommendations;

pub use markdown::format_audit_report;
pub use recommendations::{build_recommendations, Priority, Recommendation};

use crate::state::AuditSession;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Report directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to write report to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Report file name: `<prefix>_audit_<YYYYmmdd_HHMMSS>.md`
pub fn report_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!("{}_audit_{}.md", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Renders the report and writes it into `dir`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written report
/// * `Err(OutputError)` - The directory is missing or the write failed
pub fn write_report(
    session: &AuditSession,
    dir: &Path,
    prefix: &str,
    at: DateTime<Local>,
) -> OutputResult<PathBuf> {
    if !dir.is_dir() {
        return Err(OutputError::MissingDirectory(dir.to_path_buf()));
    }

    let path = dir.join(report_file_name(prefix, at));
    let markdown = format_audit_report(session, at);

    fs::write(&path, markdown).map_err(|source| OutputError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

/// Prints the end-of-run summary to stdout
pub fn print_summary(session: &AuditSession, report_path: &Path) {
    println!("=== Audit Summary: {} ===\n", session.domain);

    println!("Overview:");
    println!("  Pages crawled: {}", session.visited.len());
    println!("  Fetch errors: {}", session.fetch_failures.len());
    match session.preferred.get() {
        Some(format) => println!("  Preferred format: {}", format),
        None => println!("  Preferred format: not detected"),
    }
    println!();

    println!("Issues:");
    println!("  Canonical issues: {}", session.canonical_issues.len());
    println!("  Internal link issues: {}", session.link_issues.len());
    match &session.sitemap {
        Some(sitemap) => println!(
            "  Sitemap issues: {} ({} URLs)",
            sitemap.issues.len(),
            sitemap.total_urls
        ),
        None => println!("  Sitemap: not found"),
    }
    let long_chains: usize = session
        .redirect_reports
        .iter()
        .map(|r| r.long_chains().count())
        .sum();
    println!("  Multi-hop redirect patterns: {}", long_chains);
    println!();

    let recommendations = build_recommendations(session);
    if !recommendations.is_empty() {
        println!("Recommendations ({}):", recommendations.len());
        for rec in &recommendations {
            println!("  [{}] {}", rec.priority, rec.issue);
        }
        println!();
    }

    println!("✓ Report saved to: {}", report_path.display());
}
