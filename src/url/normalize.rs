use crate::UrlError;
use std::fmt;
use url::Url;

/// A URL in its queue/visited-set form
///
/// Only used as a dedup key. Requests always go out to the URL as it was
/// discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Returns the normalized URL as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for NormalizedUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Normalizes a URL for frontier deduplication
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Remove fragment (everything after #)
/// 3. Root path is always `/`
/// 4. Any longer path loses its trailing slashes
///
/// Scheme, host, port and query are kept as they are (apart from the host
/// lowercasing the URL parser already performs), so `http://` and
/// `https://www.` variants of the same page stay distinct.
///
/// # Examples
///
/// ```
/// use siteprobe::url::normalize_url;
///
/// let url = normalize_url("https://example.com/page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
///
/// let root = normalize_url("https://example.com").unwrap();
/// assert_eq!(root.as_str(), "https://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    let trimmed = normalize_path(url.path());
    url.set_path(&trimmed);

    Ok(NormalizedUrl(url))
}

/// Applies the trailing slash policy to a path
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
