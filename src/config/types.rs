use crate::state::PreferredFormat;
use crate::url::InternalMatch;
use serde::Deserialize;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Main configuration structure for an audit run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Builds a configuration with every default filled in for `domain`
    pub fn for_domain(domain: &str) -> Self {
        Self {
            site: SiteConfig {
                domain: domain.to_string(),
                seeds: Vec::new(),
                internal_match: InternalMatch::default(),
                default_format: PreferredFormat::HttpsWww,
                sitemap_urls: Vec::new(),
            },
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// The audited site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Bare domain, without scheme or `www.` (e.g. "example.com")
    pub domain: String,

    /// Start URLs; empty means the bare and `www.` homepages
    #[serde(default)]
    pub seeds: Vec<String>,

    /// How link hosts are matched against `domain`
    #[serde(rename = "internal-match", default)]
    pub internal_match: InternalMatch,

    /// Format used to judge canonicals before one has been detected
    #[serde(rename = "default-format", default = "default_format")]
    pub default_format: PreferredFormat,

    /// Candidate sitemap locations, probed in order
    #[serde(rename = "sitemap-urls", default)]
    pub sitemap_urls: Vec<String>,
}

impl SiteConfig {
    /// Seed URLs, falling back to both homepage variants
    pub fn seed_urls(&self) -> Vec<String> {
        if !self.seeds.is_empty() {
            return self.seeds.clone();
        }
        vec![
            format!("https://{}/", self.domain),
            format!("https://www.{}/", self.domain),
        ]
    }

    /// Sitemap candidates, falling back to `/sitemap.xml` on both hosts
    pub fn sitemap_candidates(&self) -> Vec<String> {
        if !self.sitemap_urls.is_empty() {
            return self.sitemap_urls.clone();
        }
        vec![
            format!("https://{}/sitemap.xml", self.domain),
            format!("https://www.{}/sitemap.xml", self.domain),
        ]
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page budget for the crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Hop cap for manual redirect following
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,

    /// Delay after each crawled page (milliseconds)
    #[serde(rename = "page-delay")]
    pub page_delay: u64,

    /// Delay between redirect hops (milliseconds)
    #[serde(rename = "redirect-delay")]
    pub redirect_delay: u64,

    /// Delay between redirect pattern probes (milliseconds)
    #[serde(rename = "pattern-delay")]
    pub pattern_delay: u64,

    /// Number of crawled pages whose paths get redirect probes
    #[serde(rename = "sample-pages")]
    pub sample_pages: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            request_timeout: 10,
            max_redirects: 10,
            page_delay: 1500,
            redirect_delay: 500,
            pattern_delay: 1000,
            sample_pages: 5,
        }
    }
}

/// Request header configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub accept: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the report is written into
    #[serde(rename = "report-dir")]
    pub report_dir: Option<String>,

    /// Report filename prefix; defaults to the domain with dots and dashes
    /// replaced by underscores
    #[serde(rename = "report-prefix")]
    pub report_prefix: Option<String>,
}

impl OutputConfig {
    pub fn report_dir(&self) -> &str {
        self.report_dir.as_deref().unwrap_or(".")
    }

    pub fn report_prefix(&self, domain: &str) -> String {
        match &self.report_prefix {
            Some(prefix) => prefix.clone(),
            None => domain.replace(['.', '-'], "_"),
        }
    }
}

fn default_format() -> PreferredFormat {
    PreferredFormat::HttpsWww
}
