//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the auditor:
//! - Building HTTP clients with browser-like headers
//! - GET requests for page content, following redirects automatically
//! - Manual, hop-by-hop redirect chain following for the pattern probes
//! - Error classification

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::AuditError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Statuses that continue a redirect chain
const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The request completed (any status)
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Network error (connection refused, timeout, DNS, body read)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// One step of a redirect chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub from: String,
    pub to: String,
    pub status: u16,
}

/// The outcome of following redirects from one starting URL
#[derive(Debug, Clone)]
pub struct RedirectChain {
    pub initial_url: String,
    pub final_url: String,
    /// Status of the last response received
    pub final_status: u16,
    pub hops: Vec<RedirectHop>,
}

impl RedirectChain {
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `agent` - Request header configuration
/// * `crawler` - Timeouts and redirect cap
/// * `follow_redirects` - Whether reqwest follows redirects itself; the
///   content-fetch path does, the redirect probes do not
///
/// Certificate errors are ignored, so every host variant can be probed.
///
/// # Example
///
/// ```no_run
/// use siteprobe::config::{CrawlerConfig, UserAgentConfig};
/// use siteprobe::crawler::build_http_client;
///
/// let client = build_http_client(
///     &UserAgentConfig::default(),
///     &CrawlerConfig::default(),
///     true,
/// )
/// .unwrap();
/// ```
pub fn build_http_client(
    agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
    follow_redirects: bool,
) -> Result<Client, AuditError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_str(&agent.accept).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid accept header: {}", e))
        })?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&agent.accept_language).map_err(|e| {
            crate::ConfigError::Validation(format!("Invalid accept-language header: {}", e))
        })?,
    );

    let policy = if follow_redirects {
        Policy::limited(crawler.max_redirects)
    } else {
        Policy::none()
    };

    let client = Client::builder()
        .user_agent(agent.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(crawler.request_timeout))
        .redirect(policy)
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Fetches a page, letting the client follow redirects
///
/// Never retries: a transport failure is reported as
/// `FetchResult::NetworkError` and the caller moves on.
pub async fn fetch_page(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            let final_url = response.url().to_string();

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code,
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: format!("Failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Follows redirects one hop at a time
///
/// Requires a client built with `follow_redirects = false`. Relative
/// `Location` values are resolved against the current URL. Stops at the first
/// non-redirect response or after `max_hops` hops, so the returned chain never
/// holds more than `max_hops` entries. Sleeps `delay` between hops.
///
/// A redirect without a `Location` header ends the chain at that response.
pub async fn follow_redirects(
    client: &Client,
    url: &str,
    max_hops: usize,
    delay: Duration,
) -> Result<RedirectChain, AuditError> {
    let mut current = Url::parse(url)?;
    let mut hops = Vec::new();

    let mut response = client
        .get(current.as_str())
        .send()
        .await
        .map_err(|e| AuditError::from_request(current.as_str(), e))?;

    while is_redirect(response.status().as_u16()) && hops.len() < max_hops {
        let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
        else {
            tracing::warn!("Redirect from {} has no Location header", current);
            break;
        };

        let next = current
            .join(location.trim())
            .map_err(|_| AuditError::BadLocation {
                url: current.to_string(),
            })?;

        tracing::debug!("{} -> {} ({})", current, next, response.status().as_u16());
        hops.push(RedirectHop {
            from: current.to_string(),
            to: next.to_string(),
            status: response.status().as_u16(),
        });

        current = next;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        response = client
            .get(current.as_str())
            .send()
            .await
            .map_err(|e| AuditError::from_request(current.as_str(), e))?;
    }

    Ok(RedirectChain {
        initial_url: url.to_string(),
        final_url: current.to_string(),
        final_status: response.status().as_u16(),
        hops,
    })
}

/// Returns true for statuses that continue a redirect chain
pub fn is_redirect(status: u16) -> bool {
    REDIRECT_STATUSES.contains(&status)
}
