//! Prioritized recommendations derived from audit findings

use crate::state::AuditSession;
use std::fmt;

/// Recommendation priority, ordered most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("HIGH"),
            Self::Medium => f.write_str("MEDIUM"),
        }
    }
}

/// One actionable finding for the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub priority: Priority,
    pub issue: String,
    pub description: String,
    pub action: String,
}

impl Recommendation {
    fn new(
        priority: Priority,
        issue: &str,
        description: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            issue: issue.to_string(),
            description: description.into(),
            action: action.into(),
        }
    }
}

/// Builds the recommendation list for a finished session
///
/// HIGH recommendations come before MEDIUM ones; within a priority the rule
/// order below is kept.
pub fn build_recommendations(session: &AuditSession) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let format = session.expected_format();

    let long_chains: usize = session
        .redirect_reports
        .iter()
        .map(|r| r.long_chains().count())
        .sum();
    if long_chains > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            "Redirect chains detected",
            format!(
                "Found {} URL patterns with multiple redirect hops",
                long_chains
            ),
            "Update server configuration to redirect directly to final URL in one hop (301 redirect)",
        ));
    }

    let missing = session.missing_canonicals().count();
    if missing > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            "Missing canonical tags",
            format!("{} pages are missing canonical tags", missing),
            r#"Add <link rel="canonical" href="preferred-url"> to all pages"#,
        ));
    }

    let wrong_format = session.wrong_format_canonicals().count();
    if wrong_format > 0 {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "Incorrect canonical URLs",
            format!(
                "{} pages have canonical tags pointing to non-preferred URL format",
                wrong_format
            ),
            format!("Update canonical tags to use {} format consistently", format),
        ));
    }

    let http_links = session.insecure_links().count();
    if http_links > 0 {
        recommendations.push(Recommendation::new(
            Priority::High,
            "HTTP internal links",
            format!("{} internal links use HTTP instead of HTTPS", http_links),
            "Update all internal links to use HTTPS protocol",
        ));
    }

    let www_links = session.www_link_issues().count();
    if www_links > 0 {
        recommendations.push(Recommendation::new(
            Priority::Medium,
            "Inconsistent www format in internal links",
            format!("{} internal links use wrong www format", www_links),
            format!("Update internal links to consistently use {} format", format),
        ));
    }

    if let Some(sitemap) = &session.sitemap {
        for issue in &sitemap.issues {
            if issue.contains("HTTP URLs") {
                recommendations.push(Recommendation::new(
                    Priority::High,
                    "Sitemap contains HTTP URLs",
                    issue.clone(),
                    "Update sitemap to use HTTPS URLs only",
                ));
            } else if issue.contains("mixed www") {
                recommendations.push(Recommendation::new(
                    Priority::Medium,
                    "Mixed www formats in sitemap",
                    issue.clone(),
                    "Use consistent www format in sitemap",
                ));
            }
        }
    }

    // sort_by_key is stable
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}
