//! Totals and console output for an optimizer run

use crate::optimize::transcode::ImageOutcome;
use crate::optimize::FileReport;

const RULE_WIDTH: usize = 60;

/// Aggregated results of an optimizer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptimizeSummary {
    pub files_processed: usize,
    pub files_resized: usize,
    /// Files whose size went down
    pub files_reduced: usize,
    pub files_failed: usize,
    pub total_original: u64,
    pub total_new: u64,
    pub dry_run: bool,
}

impl OptimizeSummary {
    pub fn from_reports(reports: &[FileReport], dry_run: bool) -> Self {
        let mut summary = Self {
            files_processed: reports.len(),
            dry_run,
            ..Self::default()
        };

        for report in reports {
            match &report.result {
                Ok(outcome) => {
                    summary.total_original += outcome.original_size;
                    summary.total_new += outcome.new_size;
                    if outcome.was_resized() {
                        summary.files_resized += 1;
                    }
                    if outcome.savings() > 0 {
                        summary.files_reduced += 1;
                    }
                }
                Err(_) => summary.files_failed += 1,
            }
        }

        summary
    }

    pub fn total_savings(&self) -> i64 {
        self.total_original as i64 - self.total_new as i64
    }

    pub fn savings_pct(&self) -> f64 {
        if self.total_original == 0 {
            return 0.0;
        }
        self.total_savings() as f64 / self.total_original as f64 * 100.0
    }
}

/// Formats a byte count as KB with one decimal, or MB with two from 1024 KB up
pub fn format_size(bytes: i64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb >= 1024.0 {
        format!("{:.2} MB", kb / 1024.0)
    } else {
        format!("{:.1} KB", kb)
    }
}

/// The two-line console entry for one processed file
pub fn format_outcome(relative: &str, outcome: &ImageOutcome) -> String {
    let savings = outcome.savings();
    let savings_note = if savings > 0 {
        format!(
            " (-{}, -{:.1}%)",
            format_size(savings),
            outcome.savings_pct()
        )
    } else {
        " (no change)".to_string()
    };

    let resize_note = if outcome.was_resized() {
        let (ow, oh) = outcome.original_dimensions;
        let (nw, nh) = outcome.new_dimensions;
        format!(" [RESIZE: {}x{} -> {}x{}]", ow, oh, nw, nh)
    } else {
        String::new()
    };

    format!(
        "{}\n  {} -> {}{}{}",
        relative,
        format_size(outcome.original_size as i64),
        format_size(outcome.new_size as i64),
        savings_note,
        resize_note
    )
}

pub fn print_file_report(report: &FileReport) {
    let relative = report.relative.display().to_string();
    match &report.result {
        Ok(outcome) => println!("{}", format_outcome(&relative, outcome)),
        Err(e) => println!("{}: ERROR - {}", relative, e),
    }
}

pub fn print_header(directory: &str, max_width: u32, quality: u8, files: usize, dry_run: bool) {
    let rule = "=".repeat(RULE_WIDTH);
    let prefix = if dry_run { "DRY RUN - " } else { "" };
    println!("{}WebP Image Optimizer", prefix);
    println!("{}", rule);
    println!("Directory: {}", directory);
    println!("Max width: {}px", max_width);
    println!("Quality: {}", quality);
    println!("Files found: {}", files);
    println!("{}\n", rule);
}

pub fn print_summary(summary: &OptimizeSummary) {
    let rule = "=".repeat(RULE_WIDTH);
    let (new_label, savings_label) = if summary.dry_run {
        ("Estimated new", "Estimated savings")
    } else {
        ("New", "Total savings")
    };

    println!("\n{}", rule);
    println!("SUMMARY");
    println!("{}", rule);
    println!("Total files processed: {}", summary.files_processed);
    println!("Files resized: {}", summary.files_resized);
    println!("Files with size reduction: {}", summary.files_reduced);
    if summary.files_failed > 0 {
        println!("Files with errors: {}", summary.files_failed);
    }
    println!(
        "Original total size: {}",
        format_size(summary.total_original as i64)
    );
    println!(
        "{} total size: {}",
        new_label,
        format_size(summary.total_new as i64)
    );
    println!(
        "{}: {} ({:.1}%)",
        savings_label,
        format_size(summary.total_savings()),
        summary.savings_pct()
    );

    if summary.dry_run {
        println!("\n{}", rule);
        println!("This was a DRY RUN. No files were modified.");
        println!("Run without --dry-run to apply changes.");
        println!("{}", rule);
    }
}
