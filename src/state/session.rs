//! Accumulated audit state
//!
//! One `AuditSession` is owned by the auditor for the whole run. The crawl
//! appends page records and issues, the probes attach their results, and the
//! report generator reads the finished session.

use crate::probe::{PatternReport, SitemapSummary};
use crate::state::format::{FormatLatch, PreferredFormat};
use chrono::{DateTime, Local};
use std::fmt;

/// What was learned about one fetched page
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// The URL as it was queued
    pub url: String,

    /// URL after automatic redirect following
    pub final_url: String,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Raw href of the canonical link element
    pub canonical: Option<String>,

    /// Internal links in document order, resolved against `final_url`
    pub internal_links: Vec<String>,

    pub title: Option<String>,
}

/// Classification of a canonical or internal-link problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    MissingCanonical,
    CanonicalFormat { expected: PreferredFormat },
    InsecureLink,
    MissingWww,
    UnexpectedWww,
}

impl IssueKind {
    /// Returns true for link issues about the `www.` prefix
    pub fn is_www(&self) -> bool {
        matches!(self, Self::MissingWww | Self::UnexpectedWww)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCanonical => f.write_str("Missing canonical tag"),
            Self::CanonicalFormat { expected } => write!(
                f,
                "Canonical does not use preferred format ({})",
                expected
            ),
            Self::InsecureLink => f.write_str("Internal link uses HTTP instead of HTTPS"),
            Self::MissingWww => f.write_str("Internal link missing www prefix"),
            Self::UnexpectedWww => {
                f.write_str("Internal link has www prefix when it should not")
            }
        }
    }
}

/// A problem found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// The page the problem was found on
    pub page: String,

    /// The offending canonical href or link, if any
    pub value: Option<String>,

    pub kind: IssueKind,
}

impl Issue {
    pub fn new(page: impl Into<String>, value: Option<String>, kind: IssueKind) -> Self {
        Self {
            page: page.into(),
            value,
            kind,
        }
    }
}

/// A page that could not be fetched
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub url: String,
    pub error: String,
}

/// Everything an audit run has accumulated
#[derive(Debug, Clone)]
pub struct AuditSession {
    /// Audited domain
    pub domain: String,

    /// Format used for canonical checks until one is detected
    pub default_format: PreferredFormat,

    /// Hash of the configuration the run used
    pub config_hash: String,

    pub started_at: DateTime<Local>,

    pub preferred: FormatLatch,

    /// Fetched pages in crawl order
    pub pages: Vec<PageRecord>,

    /// Every URL popped from the frontier, in crawl order
    pub visited: Vec<String>,

    pub fetch_failures: Vec<FetchFailure>,

    pub canonical_issues: Vec<Issue>,

    pub link_issues: Vec<Issue>,

    pub sitemap: Option<SitemapSummary>,

    pub redirect_reports: Vec<PatternReport>,
}

impl AuditSession {
    pub fn new(domain: &str, default_format: PreferredFormat, config_hash: &str) -> Self {
        Self {
            domain: domain.to_string(),
            default_format,
            config_hash: config_hash.to_string(),
            started_at: Local::now(),
            preferred: FormatLatch::new(),
            pages: Vec::new(),
            visited: Vec::new(),
            fetch_failures: Vec::new(),
            canonical_issues: Vec::new(),
            link_issues: Vec::new(),
            sitemap: None,
            redirect_reports: Vec::new(),
        }
    }

    /// Looks up the record for a queued URL
    pub fn page(&self, url: &str) -> Option<&PageRecord> {
        self.pages.iter().find(|p| p.url == url)
    }

    pub fn missing_canonicals(&self) -> impl Iterator<Item = &Issue> {
        self.canonical_issues
            .iter()
            .filter(|i| i.kind == IssueKind::MissingCanonical)
    }

    pub fn wrong_format_canonicals(&self) -> impl Iterator<Item = &Issue> {
        self.canonical_issues
            .iter()
            .filter(|i| matches!(i.kind, IssueKind::CanonicalFormat { .. }))
    }

    pub fn insecure_links(&self) -> impl Iterator<Item = &Issue> {
        self.link_issues
            .iter()
            .filter(|i| i.kind == IssueKind::InsecureLink)
    }

    pub fn www_link_issues(&self) -> impl Iterator<Item = &Issue> {
        self.link_issues.iter().filter(|i| i.kind.is_www())
    }

    /// The format canonicals are judged against right now
    pub fn expected_format(&self) -> PreferredFormat {
        self.preferred.get().unwrap_or(self.default_format)
    }
}
