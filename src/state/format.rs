//! Preferred scheme/host format detection
//!
//! The site's preferred format is taken from the first successful HTTPS
//! response of the crawl and is never revised afterwards, even if later pages
//! disagree.

use crate::url::has_www;
use serde::Deserialize;
use std::fmt;
use url::Url;

/// The site's chosen canonical scheme + host prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum PreferredFormat {
    /// `https://www.<domain>`
    #[serde(rename = "https://www")]
    HttpsWww,

    /// `https://<domain>` without `www.`
    #[serde(rename = "https://")]
    Https,
}

impl PreferredFormat {
    /// Detects the format a final URL is served under
    ///
    /// Returns None for plain HTTP URLs: neither format applies to them.
    pub fn from_url(url: &Url) -> Option<Self> {
        if url.scheme() != "https" {
            return None;
        }
        if has_www(url) {
            Some(Self::HttpsWww)
        } else {
            Some(Self::Https)
        }
    }

    /// The textual prefix, as shown in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HttpsWww => "https://www",
            Self::Https => "https://",
        }
    }

    /// Returns true if `candidate` is written in this format
    ///
    /// `https://` only matches HTTPS URLs whose host has no `www.` prefix.
    pub fn matches(&self, candidate: &str) -> bool {
        let lower = candidate.trim().to_lowercase();
        match self {
            Self::HttpsWww => lower.starts_with("https://www."),
            Self::Https => lower.starts_with("https://") && !lower.starts_with("https://www."),
        }
    }

    pub fn uses_www(&self) -> bool {
        matches!(self, Self::HttpsWww)
    }
}

impl fmt::Display for PreferredFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write-once holder for the detected preferred format
#[derive(Debug, Clone, Default)]
pub struct FormatLatch {
    value: Option<PreferredFormat>,
}

impl FormatLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers a response to the latch
    ///
    /// Latches only when nothing is set yet, the status is 200 and the final
    /// URL is HTTPS. Returns true if this call set the value.
    pub fn observe(&mut self, status_code: u16, final_url: &Url) -> bool {
        if self.value.is_some() || status_code != 200 {
            return false;
        }
        match PreferredFormat::from_url(final_url) {
            Some(format) => {
                tracing::info!("Detected preferred format: {}", format);
                self.value = Some(format);
                true
            }
            None => false,
        }
    }

    pub fn get(&self) -> Option<PreferredFormat> {
        self.value
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_from_url() {
        assert_eq!(
            PreferredFormat::from_url(&url("https://www.example.com/")),
            Some(PreferredFormat::HttpsWww)
        );
        assert_eq!(
            PreferredFormat::from_url(&url("https://example.com/")),
            Some(PreferredFormat::Https)
        );
        assert_eq!(PreferredFormat::from_url(&url("http://www.example.com/")), None);
    }

    #[test]
    fn test_matches_is_host_aware() {
        let www = PreferredFormat::HttpsWww;
        let bare = PreferredFormat::Https;

        assert!(www.matches("https://www.example.com/page"));
        assert!(!www.matches("https://example.com/page"));
        assert!(!www.matches("http://www.example.com/page"));

        assert!(bare.matches("https://example.com/page"));
        assert!(!bare.matches("https://www.example.com/page"));
        assert!(!bare.matches("/relative/page"));
    }

    #[test]
    fn test_latch_first_200_wins() {
        let mut latch = FormatLatch::new();
        assert!(latch.observe(200, &url("https://www.example.com/")));
        assert!(!latch.observe(200, &url("https://example.com/other")));
        assert_eq!(latch.get(), Some(PreferredFormat::HttpsWww));
    }

    #[test]
    fn test_latch_ignores_non_200() {
        let mut latch = FormatLatch::new();
        assert!(!latch.observe(404, &url("https://example.com/missing")));
        assert!(!latch.observe(301, &url("https://example.com/moved")));
        assert!(!latch.is_set());
        assert!(latch.observe(200, &url("https://example.com/")));
        assert_eq!(latch.get(), Some(PreferredFormat::Https));
    }

    #[test]
    fn test_latch_ignores_plain_http() {
        let mut latch = FormatLatch::new();
        assert!(!latch.observe(200, &url("http://example.com/")));
        assert_eq!(latch.get(), None);
    }
}
