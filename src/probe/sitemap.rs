//! Sitemap consistency checking
//!
//! Probes candidate sitemap locations in order, takes the first that answers
//! 200, and counts how its `<loc>` entries split across scheme and `www.`
//! forms.

use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;

/// Number of sitemap URLs kept as a sample for the report
const SAMPLE_SIZE: usize = 10;

/// Scheme/host breakdown of a sitemap
#[derive(Debug, Clone, Default)]
pub struct SitemapSummary {
    /// Where the sitemap was found
    pub url: String,
    pub total_urls: usize,
    pub http_urls: usize,
    pub https_urls: usize,
    pub www_urls: usize,
    pub non_www_urls: usize,
    /// The first few `<loc>` values
    pub sample_urls: Vec<String>,
    /// Human-readable consistency problems
    pub issues: Vec<String>,
}

impl SitemapSummary {
    pub fn has_http_urls(&self) -> bool {
        self.http_urls > 0
    }

    pub fn has_mixed_www(&self) -> bool {
        self.www_urls > 0 && self.non_www_urls > 0
    }
}

/// Extracts every `<loc>` value, from both url sets and sitemap indexes
///
/// Values are kept exactly as written (apart from surrounding whitespace and
/// XML escapes), whether or not they parse as absolute URLs. Parsing stops at
/// the first XML error, keeping what was read before it.
pub fn parse_sitemap_locs(xml: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut buf = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => in_loc = e.local_name().as_ref() == b"loc",
            Ok(Event::End(_)) => in_loc = false,
            Ok(Event::Text(e)) if in_loc => match e.unescape() {
                Ok(text) => push_loc(&mut locs, &text),
                Err(e) => tracing::debug!("Skipping unreadable <loc>: {}", e),
            },
            Ok(Event::CData(e)) if in_loc => {
                push_loc(&mut locs, &String::from_utf8_lossy(&e.into_inner()));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Sitemap XML error at byte {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    locs
}

fn push_loc(locs: &mut Vec<String>, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        locs.push(text.to_string());
    }
}

/// Counts scheme and `www.` forms and derives the issue strings
pub fn summarize_sitemap(url: &str, locs: &[String]) -> SitemapSummary {
    let http_urls = locs.iter().filter(|u| u.starts_with("http://")).count();
    let https_urls = locs.iter().filter(|u| u.starts_with("https://")).count();
    let www_urls = locs.iter().filter(|u| u.contains("://www.")).count();
    let non_www_urls = locs
        .iter()
        .filter(|u| u.contains("://") && !u.contains("://www."))
        .count();

    let mut summary = SitemapSummary {
        url: url.to_string(),
        total_urls: locs.len(),
        http_urls,
        https_urls,
        www_urls,
        non_www_urls,
        sample_urls: locs.iter().take(SAMPLE_SIZE).cloned().collect(),
        issues: Vec::new(),
    };

    if summary.has_http_urls() {
        summary.issues.push(format!(
            "Sitemap contains {} HTTP URLs (should be HTTPS)",
            http_urls
        ));
    }

    if summary.has_mixed_www() {
        summary.issues.push(format!(
            "Sitemap has mixed www formats: {} with www, {} without",
            www_urls, non_www_urls
        ));
    }

    summary
}

/// Fetches the first reachable sitemap candidate and summarizes it
///
/// Candidates that fail or answer anything but 200 are skipped. Returns None
/// when no candidate works.
pub async fn check_sitemap(client: &Client, candidates: &[String]) -> Option<SitemapSummary> {
    for candidate in candidates {
        let response = match client.get(candidate).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Error checking {}: {}", candidate, e);
                continue;
            }
        };

        if response.status().as_u16() != 200 {
            tracing::debug!("No sitemap at {} ({})", candidate, response.status());
            continue;
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Error reading {}: {}", candidate, e);
                continue;
            }
        };

        tracing::info!("Found sitemap at: {}", candidate);
        let locs = parse_sitemap_locs(&body);
        tracing::info!("Found {} URLs in sitemap", locs.len());
        return Some(summarize_sitemap(candidate, &locs));
    }

    tracing::warn!("No sitemap found among {} candidates", candidates.len());
    None
}
