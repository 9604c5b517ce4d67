use serde::Deserialize;
use url::Url;

/// How a link's host is compared against the audited domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InternalMatch {
    /// Host contains the domain anywhere (`blog.example.com`, but also
    /// `example.com.evil.net`)
    #[default]
    Substring,

    /// Host is the domain itself or its `www.` form
    Host,
}

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use siteprobe::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` belongs to the audited `domain`
pub fn is_internal(url: &Url, domain: &str, mode: InternalMatch) -> bool {
    let Some(host) = extract_domain(url) else {
        return false;
    };
    let domain = domain.to_lowercase();

    match mode {
        InternalMatch::Substring => host.contains(&domain),
        InternalMatch::Host => {
            host == domain || host.strip_prefix("www.") == Some(domain.as_str())
        }
    }
}

/// Returns true if the URL's host carries a `www.` prefix
pub fn has_www(url: &Url) -> bool {
    url.host_str()
        .map(|h| h.to_lowercase().starts_with("www."))
        .unwrap_or(false)
}
