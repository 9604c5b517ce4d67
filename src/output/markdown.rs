//! Markdown audit report generation
//!
//! This module renders a finished `AuditSession` as a human-readable
//! Markdown report: executive summary, redirect tables, grouped issue
//! listings, sitemap summary, recommendations and a crawled-pages sample.
//! Long lists are capped and end with an "...and N more" line.

use crate::output::recommendations::build_recommendations;
use crate::probe::{PatternOutcome, PatternReport};
use crate::state::{AuditSession, Issue, PreferredFormat};
use chrono::{DateTime, Local};
use std::fmt::Write;

const MAX_CANONICAL_ISSUES: usize = 10;
const MAX_HTTP_LINK_PAGES: usize = 5;
const MAX_HTTP_LINKS_PER_PAGE: usize = 3;
const MAX_WWW_ISSUES: usize = 5;
const MAX_CRAWLED_PAGES: usize = 20;
const MAX_FETCH_ERRORS: usize = 20;

/// Formats an audit session as a Markdown report
///
/// # Arguments
///
/// * `session` - The finished audit session
/// * `generated_at` - Timestamp printed as the audit date
pub fn format_audit_report(session: &AuditSession, generated_at: DateTime<Local>) -> String {
    let mut md = String::new();

    // Writing to a String cannot fail
    let _ = write_report(&mut md, session, generated_at);

    md
}

fn write_report(
    md: &mut String,
    session: &AuditSession,
    generated_at: DateTime<Local>,
) -> std::fmt::Result {
    writeln!(md, "# Website Audit Report: {}", session.domain)?;
    writeln!(md)?;
    writeln!(
        md,
        "**Audit Date:** {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(md)?;
    writeln!(md, "**Config Hash:** `{}`", session.config_hash)?;
    writeln!(md)?;
    writeln!(md, "---")?;
    writeln!(md)?;

    write_executive_summary(md, session)?;
    write_preferred_format(md, session)?;
    write_redirect_analysis(md, session)?;
    write_canonical_issues(md, session)?;
    write_link_issues(md, session)?;
    write_sitemap(md, session)?;
    write_recommendations(md, session)?;
    write_crawled_pages(md, session)?;

    writeln!(md, "---")?;
    writeln!(md)?;
    writeln!(md, "*End of Report*")
}

fn write_more(md: &mut String, total: usize, shown: usize, noun: &str) -> std::fmt::Result {
    if total > shown {
        writeln!(md, "*...and {} more{}*", total - shown, noun)?;
        writeln!(md)?;
    }
    Ok(())
}

fn write_executive_summary(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    let sitemap_issues = session.sitemap.as_ref().map(|s| s.issues.len()).unwrap_or(0);
    let preferred = session
        .preferred
        .get()
        .map(|f| f.to_string())
        .unwrap_or_else(|| "Not detected".to_string());

    writeln!(md, "## Executive Summary")?;
    writeln!(md)?;
    writeln!(md, "- **Pages Crawled:** {}", session.visited.len())?;
    writeln!(md, "- **Preferred Domain Format:** {}", preferred)?;
    writeln!(md, "- **Canonical Issues Found:** {}", session.canonical_issues.len())?;
    writeln!(md, "- **Internal Link Issues Found:** {}", session.link_issues.len())?;
    writeln!(md, "- **Sitemap Issues:** {}", sitemap_issues)?;
    writeln!(md, "- **Fetch Errors:** {}", session.fetch_failures.len())?;
    writeln!(md)
}

fn write_preferred_format(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 1. Preferred Domain Format")?;
    writeln!(md)?;
    match session.preferred.get() {
        Some(format) => {
            let host = if format.uses_www() {
                format!("www.{}", session.domain)
            } else {
                session.domain.clone()
            };
            writeln!(md, "**Detected Format:** `https://{}/`", host)?;
            writeln!(md)?;
            match format {
                PreferredFormat::HttpsWww => writeln!(
                    md,
                    "✓ The site uses HTTPS with www prefix (recommended)"
                )?,
                PreferredFormat::Https => {
                    writeln!(md, "✓ The site uses HTTPS without www prefix")?
                }
            }
        }
        None => {
            writeln!(md, "⚠️ Could not detect preferred format")?;
            writeln!(md)?;
            writeln!(
                md,
                "Canonical tags were checked against the default format `{}`.",
                session.default_format
            )?;
        }
    }
    writeln!(md)
}

fn write_redirect_analysis(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 2. Redirect Pattern Analysis")?;
    writeln!(md)?;

    if session.redirect_reports.is_empty() {
        writeln!(md, "No redirect patterns were tested.")?;
        writeln!(md)?;
    }

    for report in &session.redirect_reports {
        write_pattern_report(md, report)?;
    }
    Ok(())
}

fn write_pattern_report(md: &mut String, report: &PatternReport) -> std::fmt::Result {
    writeln!(md, "### {}", report.name)?;
    writeln!(md)?;

    let destinations = report.final_destinations();
    match destinations.iter().next() {
        Some(dest) if destinations.len() == 1 => {
            writeln!(md, "✓ All URL patterns redirect to: `{}`", dest)?
        }
        _ => writeln!(md, "⚠️ URL patterns redirect to different destinations!")?,
    }
    writeln!(md)?;

    writeln!(md, "| Pattern | Initial URL | Redirects | Final URL | Status |")?;
    writeln!(md, "|---------|-------------|-----------|-----------|--------|")?;
    for result in &report.results {
        match &result.outcome {
            PatternOutcome::Resolved(chain) => {
                let icon = if result.is_healthy() { "✓" } else { "⚠️" };
                writeln!(
                    md,
                    "| {} | {} | {} {} | {} | {} |",
                    result.pattern,
                    chain.initial_url,
                    chain.hop_count(),
                    icon,
                    chain.final_url,
                    chain.final_status
                )?;
            }
            PatternOutcome::Failed { initial_url, error } => {
                writeln!(
                    md,
                    "| {} | {} | ERROR | - | {} |",
                    result.pattern,
                    initial_url,
                    error.replace('|', "\\|")
                )?;
            }
        }
    }

    if report.has_redirects() {
        writeln!(md)?;
        writeln!(md, "**Redirect Chains:**")?;
        for result in &report.results {
            let Some(chain) = result.chain().filter(|c| c.hop_count() > 0) else {
                continue;
            };
            writeln!(md)?;
            writeln!(md, "*{}:*", result.pattern)?;
            for (i, hop) in chain.hops.iter().enumerate() {
                writeln!(md, "{}. `{}` → `{}` ({})", i + 1, hop.from, hop.to, hop.status)?;
            }
        }
    }

    writeln!(md)
}

fn write_canonical_issues(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 3. Canonical Tag Issues")?;
    writeln!(md)?;

    if session.canonical_issues.is_empty() {
        writeln!(md, "✓ No canonical tag issues found!")?;
        return writeln!(md);
    }

    writeln!(
        md,
        "Found **{} pages** with canonical tag issues:",
        session.canonical_issues.len()
    )?;
    writeln!(md)?;

    let missing: Vec<&Issue> = session.missing_canonicals().collect();
    if !missing.is_empty() {
        writeln!(md, "### Missing Canonical Tags ({} pages)", missing.len())?;
        writeln!(md)?;
        for issue in missing.iter().take(MAX_CANONICAL_ISSUES) {
            writeln!(md, "- {}", issue.page)?;
        }
        writeln!(md)?;
        write_more(md, missing.len(), MAX_CANONICAL_ISSUES, "")?;
    }

    let wrong: Vec<&Issue> = session.wrong_format_canonicals().collect();
    if !wrong.is_empty() {
        writeln!(md, "### Incorrect Canonical Format ({} pages)", wrong.len())?;
        writeln!(md)?;
        for issue in wrong.iter().take(MAX_CANONICAL_ISSUES) {
            writeln!(md, "- **Page:** {}", issue.page)?;
            writeln!(
                md,
                "  - **Canonical:** `{}`",
                issue.value.as_deref().unwrap_or_default()
            )?;
            writeln!(md, "  - **Issue:** {}", issue.kind)?;
            writeln!(md)?;
        }
        write_more(md, wrong.len(), MAX_CANONICAL_ISSUES, "")?;
    }

    Ok(())
}

fn write_link_issues(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 4. Internal Link Issues")?;
    writeln!(md)?;

    if session.link_issues.is_empty() {
        writeln!(md, "✓ No internal link issues found!")?;
        return writeln!(md);
    }

    writeln!(
        md,
        "Found **{} internal links** with issues:",
        session.link_issues.len()
    )?;
    writeln!(md)?;

    let http: Vec<&Issue> = session.insecure_links().collect();
    if !http.is_empty() {
        writeln!(md, "### HTTP Links ({} instances)", http.len())?;
        writeln!(md)?;

        // Group by page, keeping first-seen order
        let mut by_page: Vec<(&str, Vec<&str>)> = Vec::new();
        for issue in &http {
            let link = issue.value.as_deref().unwrap_or_default();
            let page = issue.page.as_str();
            match by_page.iter_mut().find(|(p, _)| *p == page) {
                Some((_, links)) => links.push(link),
                None => by_page.push((page, vec![link])),
            }
        }

        for (page, links) in by_page.iter().take(MAX_HTTP_LINK_PAGES) {
            writeln!(md, "- **{}**", page)?;
            for link in links.iter().take(MAX_HTTP_LINKS_PER_PAGE) {
                writeln!(md, "  - {}", link)?;
            }
            if links.len() > MAX_HTTP_LINKS_PER_PAGE {
                writeln!(
                    md,
                    "  - *...and {} more*",
                    links.len() - MAX_HTTP_LINKS_PER_PAGE
                )?;
            }
            writeln!(md)?;
        }
        write_more(md, by_page.len(), MAX_HTTP_LINK_PAGES, " pages")?;
    }

    let www: Vec<&Issue> = session.www_link_issues().collect();
    if !www.is_empty() {
        writeln!(md, "### WWW Format Issues ({} instances)", www.len())?;
        writeln!(md)?;
        for issue in www.iter().take(MAX_WWW_ISSUES) {
            writeln!(md, "- **Page:** {}", issue.page)?;
            writeln!(md, "  - **Link:** {}", issue.value.as_deref().unwrap_or_default())?;
            writeln!(md, "  - **Issue:** {}", issue.kind)?;
            writeln!(md)?;
        }
        write_more(md, www.len(), MAX_WWW_ISSUES, "")?;
    }

    Ok(())
}

fn write_sitemap(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 5. Sitemap Analysis")?;
    writeln!(md)?;

    let Some(sitemap) = &session.sitemap else {
        writeln!(md, "⚠️ Could not fetch sitemap")?;
        return writeln!(md);
    };

    writeln!(md, "**Sitemap URL:** {}", sitemap.url)?;
    writeln!(md)?;
    writeln!(md, "- Total URLs: {}", sitemap.total_urls)?;
    writeln!(md, "- HTTP URLs: {}", sitemap.http_urls)?;
    writeln!(md, "- HTTPS URLs: {}", sitemap.https_urls)?;
    writeln!(md, "- URLs with www: {}", sitemap.www_urls)?;
    writeln!(md, "- URLs without www: {}", sitemap.non_www_urls)?;
    writeln!(md)?;

    if sitemap.issues.is_empty() {
        writeln!(md, "✓ No sitemap issues found!")?;
    } else {
        writeln!(md, "**Issues Found:**")?;
        writeln!(md)?;
        for issue in &sitemap.issues {
            writeln!(md, "- ⚠️ {}", issue)?;
        }
    }
    writeln!(md)?;

    if !sitemap.sample_urls.is_empty() {
        writeln!(md, "**Sample URLs from sitemap:**")?;
        writeln!(md)?;
        for url in &sitemap.sample_urls {
            writeln!(md, "- {}", url)?;
        }
        writeln!(md)?;
        write_more(md, sitemap.total_urls, sitemap.sample_urls.len(), "")?;
    }

    Ok(())
}

fn write_recommendations(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 6. Recommendations")?;
    writeln!(md)?;

    let recommendations = build_recommendations(session);
    if recommendations.is_empty() {
        writeln!(
            md,
            "✓ **No major issues found!** The site appears to be properly configured."
        )?;
        return writeln!(md);
    }

    for (i, rec) in recommendations.iter().enumerate() {
        writeln!(md, "### {}. {} [{} Priority]", i + 1, rec.issue, rec.priority)?;
        writeln!(md)?;
        writeln!(md, "**Description:** {}", rec.description)?;
        writeln!(md)?;
        writeln!(md, "**Action Required:** {}", rec.action)?;
        writeln!(md)?;
    }
    Ok(())
}

fn write_crawled_pages(md: &mut String, session: &AuditSession) -> std::fmt::Result {
    writeln!(md, "## 7. Crawled Pages Summary")?;
    writeln!(md)?;
    writeln!(md, "Total pages crawled: {}", session.visited.len())?;
    writeln!(md)?;

    if !session.visited.is_empty() {
        writeln!(md, "**Sample of crawled pages:**")?;
        writeln!(md)?;
        for url in session.visited.iter().take(MAX_CRAWLED_PAGES) {
            let page = session.page(url);
            let status = page
                .map(|p| p.status_code.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let title = page
                .and_then(|p| p.title.as_deref())
                .unwrap_or("No title");
            writeln!(md, "- [{}] {}", status, url)?;
            writeln!(md, "  - Title: {}", title)?;
        }
        writeln!(md)?;
        write_more(md, session.visited.len(), MAX_CRAWLED_PAGES, " pages")?;
    }

    if !session.fetch_failures.is_empty() {
        writeln!(md, "### Fetch Errors ({})", session.fetch_failures.len())?;
        writeln!(md)?;
        for failure in session.fetch_failures.iter().take(MAX_FETCH_ERRORS) {
            writeln!(md, "- {}: {}", failure.url, failure.error)?;
        }
        writeln!(md)?;
        write_more(md, session.fetch_failures.len(), MAX_FETCH_ERRORS, "")?;
    }

    Ok(())
}
