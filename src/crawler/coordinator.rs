//! Audit coordinator - main orchestration logic
//!
//! This module drives a complete audit run:
//! - Seeding and draining the frontier
//! - Fetch, analyze and link discovery for each page
//! - Sitemap checking after the crawl
//! - Redirect pattern probes for the homepage and sample paths

use crate::config::Config;
use crate::crawler::analyzer::analyze_page;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::probe::{check_sitemap, sample_paths, test_url_patterns};
use crate::state::{AuditSession, FetchFailure};
use crate::AuditError;
use reqwest::Client;
use std::time::{Duration, Instant};

/// Owns everything a single audit run needs
pub struct Auditor {
    config: Config,
    /// Follows redirects itself; used for page and sitemap fetches
    client: Client,
    /// Never follows redirects; used for pattern probes
    probe_client: Client,
    frontier: Frontier,
    session: AuditSession,
}

impl Auditor {
    /// Creates an auditor with the frontier seeded from the configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Validated audit configuration
    /// * `config_hash` - Hash of the configuration, carried into the report
    pub fn new(config: Config, config_hash: &str) -> Result<Self, AuditError> {
        let client = build_http_client(&config.user_agent, &config.crawler, true)?;
        let probe_client = build_http_client(&config.user_agent, &config.crawler, false)?;

        let mut frontier = Frontier::new(config.crawler.max_pages);
        for seed in config.site.seed_urls() {
            frontier.add_to_frontier(&seed)?;
        }

        let session = AuditSession::new(
            &config.site.domain,
            config.site.default_format,
            config_hash,
        );

        Ok(Self {
            config,
            client,
            probe_client,
            frontier,
            session,
        })
    }

    pub fn session(&self) -> &AuditSession {
        &self.session
    }

    /// Crawls until the frontier empties or the page budget is spent
    pub async fn crawl(&mut self) -> Result<(), AuditError> {
        tracing::info!(
            "Crawling {} (up to {} pages)",
            self.config.site.domain,
            self.frontier.budget()
        );

        let page_delay = Duration::from_millis(self.config.crawler.page_delay);
        let start_time = Instant::now();

        while let Some(next) = self.frontier.next_url() {
            tracing::info!(
                "Crawling [{}/{}]: {}",
                self.frontier.visited_count(),
                self.frontier.budget(),
                next.url
            );
            self.session.visited.push(next.key.to_string());

            self.process_url(&next.url).await?;

            if !page_delay.is_zero() {
                tokio::time::sleep(page_delay).await;
            }
        }

        if self.frontier.budget_exhausted() {
            tracing::info!(
                "Page budget reached with {} URLs still queued",
                self.frontier.frontier_size()
            );
        } else {
            tracing::info!("Frontier is empty, crawl complete");
        }

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}",
            self.frontier.visited_count(),
            start_time.elapsed()
        );

        Ok(())
    }

    /// Fetches and analyzes one URL, queueing the links it discovers
    async fn process_url(&mut self, url: &str) -> Result<(), AuditError> {
        let (final_url, status_code, body) = match fetch_page(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => (final_url, status_code, body),
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error crawling {}: {}", url, error);
                self.session.fetch_failures.push(FetchFailure {
                    url: url.to_string(),
                    error,
                });
                return Ok(());
            }
        };

        let analysis = analyze_page(
            url,
            &final_url,
            status_code,
            &body,
            &self.config.site,
            &mut self.session.preferred,
        )?;

        let mut queued = 0;
        for link in &analysis.record.internal_links {
            match self.frontier.add_to_frontier(link) {
                Ok(true) => queued += 1,
                Ok(false) => {}
                Err(e) => tracing::debug!("Skipping link {}: {}", link, e),
            }
        }

        tracing::debug!(
            "{} -> {} ({}), {} internal links, {} new",
            url,
            final_url,
            status_code,
            analysis.record.internal_links.len(),
            queued
        );

        self.session.canonical_issues.extend(analysis.canonical_issues);
        self.session.link_issues.extend(analysis.link_issues);
        self.session.pages.push(analysis.record);

        Ok(())
    }

    /// Looks for a sitemap among the configured candidates
    pub async fn check_sitemap(&mut self) {
        tracing::info!("Checking sitemap...");
        let candidates = self.config.site.sitemap_candidates();
        self.session.sitemap = check_sitemap(&self.client, &candidates).await;
    }

    /// Probes the homepage and sample paths in all four scheme/host forms
    pub async fn test_redirect_patterns(&mut self) {
        let domain = self.config.site.domain.clone();
        let crawler = self.config.crawler.clone();

        tracing::info!("Testing URL patterns for homepage...");
        let homepage = test_url_patterns(&self.probe_client, &domain, "Homepage", "/", &crawler).await;
        self.session.redirect_reports.push(homepage);

        let samples = sample_paths(&self.session.pages, crawler.sample_pages);
        for (i, path) in samples.iter().enumerate() {
            let name = format!("Sample page {} ({})", i + 1, path);
            tracing::info!("Testing URL patterns for {}...", path);
            let report = test_url_patterns(&self.probe_client, &domain, &name, path, &crawler).await;
            self.session.redirect_reports.push(report);
        }
    }

    /// Runs crawl, sitemap check and redirect probes in order
    pub async fn run(mut self) -> Result<AuditSession, AuditError> {
        tracing::info!("Starting audit of {}", self.config.site.domain);

        self.crawl().await?;
        self.check_sitemap().await;
        self.test_redirect_patterns().await;

        match self.session.preferred.get() {
            Some(format) => tracing::info!("Preferred format: {}", format),
            None => tracing::warn!("Preferred format could not be detected"),
        }

        Ok(self.session)
    }
}

/// Runs a complete audit and returns the accumulated session
///
/// # Example
///
/// ```no_run
/// use siteprobe::config::load_config_with_hash;
/// use siteprobe::crawler::run_audit;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("audit.toml"))?;
/// let session = run_audit(config, &hash).await?;
/// println!("{} pages crawled", session.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_audit(config: Config, config_hash: &str) -> Result<AuditSession, AuditError> {
    Auditor::new(config, config_hash)?.run().await
}
