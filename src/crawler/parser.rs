//! HTML parser for extracting links and metadata
//!
//! This module handles parsing HTML content to extract:
//! - The canonical link element's href
//! - Links from anchor tags (absolute URLs)
//! - Page title

use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// The href of the first `<link rel="canonical">`, exactly as written
    pub canonical: Option<String>,

    /// All anchor links found on the page (absolute URLs)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts the canonical, links and title
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
/// - Anything that does not resolve to HTTP(S)
///
/// The canonical href is returned unresolved so its format can be judged as
/// the site author wrote it.
///
/// # Example
///
/// ```
/// use siteprobe::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title>
///     <link rel="canonical" href="https://www.example.com/"></head>
///     <body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://www.example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.canonical.as_deref(), Some("https://www.example.com/"));
/// assert_eq!(parsed.links, vec!["https://www.example.com/page"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        canonical: extract_canonical(&document),
        links: extract_links(&document, base_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the first canonical href
fn extract_canonical(document: &Html) -> Option<String> {
    let selector = Selector::parse("link[rel~='canonical'][href]").ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .find(|href| !href.is_empty())
        .map(str::to_string)
}

/// Extracts all valid anchor links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
