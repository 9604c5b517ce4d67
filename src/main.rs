//! Siteprobe main entry point
//!
//! This is the command-line interface for the Siteprobe SEO auditor.

use anyhow::{bail, Context};
use chrono::Local;
use clap::Parser;
use siteprobe::config::{compute_hash, load_config_with_hash, validate, Config};
use siteprobe::crawler::run_audit;
use siteprobe::output::{print_summary, write_report};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Siteprobe: a technical SEO auditor
///
/// Crawls one domain, checks canonical tags and internal links against the
/// site's preferred scheme/host format, probes redirect patterns, inspects
/// the sitemap and writes a Markdown report.
#[derive(Parser, Debug)]
#[command(name = "siteprobe")]
#[command(version = "1.0.0")]
#[command(about = "A technical SEO auditor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "domain")]
    config: Option<PathBuf>,

    /// Audit this domain with default settings instead of a config file
    #[arg(long, conflicts_with = "config")]
    domain: Option<String>,

    /// Override the page budget
    #[arg(long)]
    max_pages: Option<usize>,

    /// Override the report directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Validate config and show what would be audited without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (mut config, config_hash) = load(&cli)?;

    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.report_dir = Some(dir.display().to_string());
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_audit(config, &config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("siteprobe=info,warn"),
            1 => EnvFilter::new("siteprobe=debug,info"),
            2 => EnvFilter::new("siteprobe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file, or builds a default config for `--domain`
fn load(cli: &Cli) -> anyhow::Result<(Config, String)> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
        let (config, hash) = load_config_with_hash(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
        return Ok((config, hash));
    }

    match &cli.domain {
        Some(domain) => {
            let domain = domain.trim().to_lowercase();
            let hash = compute_hash(&domain);
            Ok((Config::for_domain(&domain), hash))
        }
        None => bail!("either CONFIG or --domain is required"),
    }
}

/// Handles the --dry-run mode: shows what would be audited
fn handle_dry_run(config: &Config, config_hash: &str) {
    let site = &config.site;

    println!("=== Siteprobe Dry Run ===\n");

    println!("Site:");
    println!("  Domain: {}", site.domain);
    println!("  Internal match: {:?}", site.internal_match);
    println!("  Default format: {}", site.default_format);

    let seeds = site.seed_urls();
    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\nSitemap candidates:");
    for candidate in site.sitemap_candidates() {
        println!("  - {}", candidate);
    }

    println!("\nCrawler Configuration:");
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    println!("  Page delay: {}ms", config.crawler.page_delay);
    println!("  Redirect delay: {}ms", config.crawler.redirect_delay);
    println!("  Pattern delay: {}ms", config.crawler.pattern_delay);
    println!("  Sample pages: {}", config.crawler.sample_pages);

    println!("\nOutput:");
    println!("  Report directory: {}", config.output.report_dir());
    println!("  Report prefix: {}", config.output.report_prefix(&site.domain));
    println!("  Config hash: {}", config_hash);

    println!("\n✓ Configuration is valid");
}

/// Runs the audit and writes the report
async fn handle_audit(config: Config, config_hash: &str) -> anyhow::Result<()> {
    let report_dir = PathBuf::from(config.output.report_dir());
    let prefix = config.output.report_prefix(&config.site.domain);

    if !report_dir.is_dir() {
        bail!("Report directory does not exist: {}", report_dir.display());
    }

    let session = match run_audit(config, config_hash).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Audit failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Generating report...");
    let path = write_report(&session, &report_dir, &prefix, Local::now())
        .context("Failed to write report")?;

    print_summary(&session, &path);
    Ok(())
}
