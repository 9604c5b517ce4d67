//! Page analysis
//!
//! Turns one fetched page into a `PageRecord` plus the canonical and
//! internal-link issues it exhibits. The preferred-format latch is passed in
//! explicitly: the first 200 HTTPS response of the run sets it, and every page
//! from then on is judged against it.

use crate::config::SiteConfig;
use crate::crawler::parser::parse_html;
use crate::state::{FormatLatch, Issue, IssueKind, PageRecord, PreferredFormat};
use crate::url::{extract_domain, has_www, is_internal};
use crate::AuditError;
use url::Url;

/// Findings for a single page
#[derive(Debug, Clone)]
pub struct PageAnalysis {
    pub record: PageRecord,
    pub canonical_issues: Vec<Issue>,
    pub link_issues: Vec<Issue>,
}

/// Analyzes a fetched page
///
/// # Arguments
///
/// * `queued_url` - The URL as it was taken from the frontier
/// * `final_url` - The URL after automatic redirects
/// * `status_code` - Status of the final response
/// * `body` - Response body
/// * `site` - Audited domain and matching rules
/// * `latch` - Preferred format; may be set by this call
pub fn analyze_page(
    queued_url: &str,
    final_url: &str,
    status_code: u16,
    body: &str,
    site: &SiteConfig,
    latch: &mut FormatLatch,
) -> Result<PageAnalysis, AuditError> {
    let base = Url::parse(final_url)?;
    let parsed = parse_html(body, &base);

    let internal_links: Vec<String> = parsed
        .links
        .into_iter()
        .filter(|link| {
            Url::parse(link)
                .map(|u| is_internal(&u, &site.domain, site.internal_match))
                .unwrap_or(false)
        })
        .collect();

    latch.observe(status_code, &base);

    let expected = latch.get().unwrap_or(site.default_format);
    let canonical_issues = check_canonical(queued_url, parsed.canonical.as_deref(), expected)
        .into_iter()
        .collect();

    let link_issues = internal_links
        .iter()
        .filter_map(|link| check_internal_link(queued_url, link, &site.domain, latch.get()))
        .collect();

    Ok(PageAnalysis {
        record: PageRecord {
            url: queued_url.to_string(),
            final_url: final_url.to_string(),
            status_code,
            canonical: parsed.canonical,
            internal_links,
            title: parsed.title,
        },
        canonical_issues,
        link_issues,
    })
}

/// Classifies a page's canonical tag
pub fn check_canonical(
    page: &str,
    canonical: Option<&str>,
    expected: PreferredFormat,
) -> Option<Issue> {
    match canonical {
        None => Some(Issue::new(page, None, IssueKind::MissingCanonical)),
        Some(href) if !expected.matches(href) => Some(Issue::new(
            page,
            Some(href.to_string()),
            IssueKind::CanonicalFormat { expected },
        )),
        Some(_) => None,
    }
}

/// Classifies one internal link
///
/// Plain HTTP is always an issue. The `www.` check needs a detected preferred
/// format and only applies to the domain itself, not to other subdomains.
pub fn check_internal_link(
    page: &str,
    link: &str,
    domain: &str,
    preferred: Option<PreferredFormat>,
) -> Option<Issue> {
    let url = Url::parse(link).ok()?;

    if url.scheme() == "http" {
        return Some(Issue::new(page, Some(link.to_string()), IssueKind::InsecureLink));
    }

    let preferred = preferred?;
    let host = extract_domain(&url)?;
    let bare = host.strip_prefix("www.").unwrap_or(&host);
    if bare != domain.to_lowercase() {
        return None;
    }

    let kind = match (preferred.uses_www(), has_www(&url)) {
        (true, false) => IssueKind::MissingWww,
        (false, true) => IssueKind::UnexpectedWww,
        _ => return None,
    };

    Some(Issue::new(page, Some(link.to_string()), kind))
}
