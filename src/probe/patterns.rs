//! Redirect pattern testing
//!
//! For a path, requests all four scheme/host permutations of the domain and
//! records the redirect chain each one takes. A healthy site sends every
//! permutation to the same destination in at most one hop.

use crate::config::CrawlerConfig;
use crate::crawler::{follow_redirects, RedirectChain};
use crate::state::PageRecord;
use reqwest::Client;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use url::Url;

/// One scheme/host permutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlPattern {
    HttpNoWww,
    HttpWww,
    HttpsNoWww,
    HttpsWww,
}

impl UrlPattern {
    /// All permutations in probe order
    pub const ALL: [UrlPattern; 4] = [
        UrlPattern::HttpNoWww,
        UrlPattern::HttpWww,
        UrlPattern::HttpsNoWww,
        UrlPattern::HttpsWww,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::HttpNoWww => "http_nowww",
            Self::HttpWww => "http_www",
            Self::HttpsNoWww => "https_nowww",
            Self::HttpsWww => "https_www",
        }
    }

    /// Builds the URL for `path` on `domain` in this permutation
    pub fn url_for(&self, domain: &str, path: &str) -> String {
        let (scheme, prefix) = match self {
            Self::HttpNoWww => ("http", ""),
            Self::HttpWww => ("http", "www."),
            Self::HttpsNoWww => ("https", ""),
            Self::HttpsWww => ("https", "www."),
        };
        format!("{}://{}{}{}", scheme, prefix, domain, path)
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened when one permutation was probed
#[derive(Debug, Clone)]
pub enum PatternOutcome {
    Resolved(RedirectChain),
    Failed { initial_url: String, error: String },
}

/// Probe result for one permutation
#[derive(Debug, Clone)]
pub struct PatternResult {
    pub pattern: UrlPattern,
    pub outcome: PatternOutcome,
}

impl PatternResult {
    pub fn initial_url(&self) -> &str {
        match &self.outcome {
            PatternOutcome::Resolved(chain) => &chain.initial_url,
            PatternOutcome::Failed { initial_url, .. } => initial_url,
        }
    }

    pub fn chain(&self) -> Option<&RedirectChain> {
        match &self.outcome {
            PatternOutcome::Resolved(chain) => Some(chain),
            PatternOutcome::Failed { .. } => None,
        }
    }

    /// Resolved in at most one hop
    pub fn is_healthy(&self) -> bool {
        self.chain().map(|c| c.hop_count() <= 1).unwrap_or(false)
    }
}

/// All permutations probed for one path
#[derive(Debug, Clone)]
pub struct PatternReport {
    /// Label used in the report ("Homepage", "Sample page 1 (/about)")
    pub name: String,
    pub results: Vec<PatternResult>,
}

impl PatternReport {
    /// Distinct final URLs of the permutations that resolved
    pub fn final_destinations(&self) -> BTreeSet<&str> {
        self.results
            .iter()
            .filter_map(|r| r.chain())
            .map(|c| c.final_url.as_str())
            .collect()
    }

    /// True when every resolved permutation lands on the same URL
    pub fn is_consistent(&self) -> bool {
        self.final_destinations().len() == 1
    }

    /// Permutations that needed more than one hop
    pub fn long_chains(&self) -> impl Iterator<Item = &PatternResult> {
        self.results
            .iter()
            .filter(|r| r.chain().map(|c| c.hop_count() > 1).unwrap_or(false))
    }

    pub fn has_redirects(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.chain().map(|c| c.hop_count() > 0).unwrap_or(false))
    }
}

/// The four permutation URLs for `path` on `domain`
pub fn pattern_targets(domain: &str, path: &str) -> Vec<(UrlPattern, String)> {
    UrlPattern::ALL
        .iter()
        .map(|p| (*p, p.url_for(domain, path)))
        .collect()
}

/// Probes each target through the manual redirect follower
///
/// Failures are recorded per permutation and never abort the others. Sleeps
/// `pattern-delay` after each probe.
pub async fn probe_patterns(
    client: &Client,
    name: &str,
    targets: &[(UrlPattern, String)],
    crawler: &CrawlerConfig,
) -> PatternReport {
    let hop_delay = Duration::from_millis(crawler.redirect_delay);
    let pattern_delay = Duration::from_millis(crawler.pattern_delay);
    let mut results = Vec::with_capacity(targets.len());

    for (pattern, url) in targets {
        tracing::info!("  Testing {}: {}", pattern, url);

        let outcome = match follow_redirects(client, url, crawler.max_redirects, hop_delay).await {
            Ok(chain) => {
                tracing::debug!(
                    "{} resolved to {} in {} hops",
                    url,
                    chain.final_url,
                    chain.hop_count()
                );
                PatternOutcome::Resolved(chain)
            }
            Err(e) => {
                tracing::warn!("Probe of {} failed: {}", url, e);
                PatternOutcome::Failed {
                    initial_url: url.clone(),
                    error: e.to_string(),
                }
            }
        };

        results.push(PatternResult {
            pattern: *pattern,
            outcome,
        });

        if !pattern_delay.is_zero() {
            tokio::time::sleep(pattern_delay).await;
        }
    }

    PatternReport {
        name: name.to_string(),
        results,
    }
}

/// Probes all four permutations of `path` on `domain`
pub async fn test_url_patterns(
    client: &Client,
    domain: &str,
    name: &str,
    path: &str,
    crawler: &CrawlerConfig,
) -> PatternReport {
    let targets = pattern_targets(domain, path);
    probe_patterns(client, name, &targets, crawler).await
}

/// Distinct non-root paths of crawled pages, in crawl order
pub fn sample_paths(pages: &[PageRecord], limit: usize) -> Vec<String> {
    let mut seen = BTreeSet::new();
    pages
        .iter()
        .filter_map(|page| Url::parse(&page.url).ok())
        .map(|url| url.path().to_string())
        .filter(|path| !path.is_empty() && path != "/")
        .filter(|path| seen.insert(path.clone()))
        .take(limit)
        .collect()
}
