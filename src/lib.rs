//! Siteprobe: a technical SEO auditor and WebP batch optimizer
//!
//! The auditor crawls a single domain, checks canonical tags and internal
//! links against the site's preferred scheme/host format, probes redirect
//! patterns, inspects the sitemap and writes a Markdown report. The
//! optimizer resizes and recompresses WebP images in a directory tree.

pub mod config;
pub mod crawler;
pub mod optimize;
pub mod output;
pub mod probe;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Redirect from {url} has no usable Location header")]
    BadLocation { url: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl AuditError {
    /// Classifies a reqwest failure for the given URL
    pub fn from_request(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Image optimizer errors
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("'{}' is not a valid directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("Max width must be at least 1")]
    InvalidMaxWidth,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Failed to encode WebP: {0}")]
    Encode(String),
}

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{AuditSession, FormatLatch, PreferredFormat};
pub use crate::url::{is_internal, normalize_url, InternalMatch, NormalizedUrl};
