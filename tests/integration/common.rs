//! Shared fixtures

use siteprobe::config::{Config, CrawlerConfig, UserAgentConfig};
use siteprobe::crawler::build_http_client;
use wiremock::{MockServer, ResponseTemplate};

/// Audit config pointed at a mock server, with all delays disabled
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::for_domain("127.0.0.1");
    config.site.seeds = vec![format!("{}/", server.uri())];
    config.site.sitemap_urls = vec![format!("{}/sitemap.xml", server.uri())];
    config.crawler = fast_crawler();
    config
}

pub fn fast_crawler() -> CrawlerConfig {
    CrawlerConfig {
        request_timeout: 5,
        page_delay: 0,
        redirect_delay: 0,
        pattern_delay: 0,
        ..CrawlerConfig::default()
    }
}

/// Client that reports redirects instead of following them
pub fn manual_client() -> reqwest::Client {
    build_http_client(&UserAgentConfig::default(), &fast_crawler(), false)
        .expect("Failed to build client")
}

/// Client that follows redirects itself
pub fn following_client() -> reqwest::Client {
    build_http_client(&UserAgentConfig::default(), &fast_crawler(), true)
        .expect("Failed to build client")
}

/// An HTML page with an optional canonical and the given anchors
pub fn html_page(status: u16, title: &str, canonical: Option<&str>, links: &[&str]) -> ResponseTemplate {
    let head = canonical
        .map(|c| format!(r#"<link rel="canonical" href="{}">"#, c))
        .unwrap_or_default();
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">link</a>"#, l))
        .collect();

    ResponseTemplate::new(status)
        .set_body_string(format!(
            "<html><head><title>{}</title>{}</head><body>{}</body></html>",
            title, head, anchors
        ))
        .insert_header("content-type", "text/html")
}

/// A urlset sitemap listing `urls`
pub fn sitemap_body(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}
