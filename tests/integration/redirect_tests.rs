//! Redirect-chain following and pattern probing against a mock server

use crate::common::{fast_crawler, following_client, manual_client};
use siteprobe::crawler::{fetch_page, follow_redirects, FetchResult};
use siteprobe::probe::{probe_patterns, PatternOutcome, UrlPattern};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// `/r/N` redirects to `/r/N+1` until `/r/<last>`, which answers 200
struct RedirectLadder {
    last: u32,
}

impl Respond for RedirectLadder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let step: u32 = request
            .url
            .path()
            .trim_start_matches("/r/")
            .parse()
            .unwrap_or(0);

        if step >= self.last {
            ResponseTemplate::new(200).set_body_string("done")
        } else {
            ResponseTemplate::new(301).insert_header("Location", format!("/r/{}", step + 1).as_str())
        }
    }
}

#[tokio::test]
async fn test_chain_truncated_at_ten_hops() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/r/\d+$"))
        .respond_with(RedirectLadder { last: 15 })
        .mount(&mock_server)
        .await;

    let start = format!("{}/r/0", mock_server.uri());
    let chain = follow_redirects(&manual_client(), &start, 10, Duration::ZERO)
        .await
        .expect("Redirect following failed");

    assert_eq!(chain.hop_count(), 10);
    assert_eq!(chain.initial_url, start);
    assert_eq!(chain.final_url, format!("{}/r/10", mock_server.uri()));
    assert_eq!(chain.final_status, 301);
    assert_eq!(chain.hops[0].from, start);
    assert_eq!(chain.hops[9].to, chain.final_url);
}

#[tokio::test]
async fn test_short_chain_reaches_destination() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/r/\d+$"))
        .respond_with(RedirectLadder { last: 3 })
        .mount(&mock_server)
        .await;

    let start = format!("{}/r/0", mock_server.uri());
    let chain = follow_redirects(&manual_client(), &start, 10, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(chain.hop_count(), 3);
    assert_eq!(chain.final_status, 200);
    assert!(chain.hops.iter().all(|h| h.status == 301));
}

#[tokio::test]
async fn test_relative_location_resolved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "new"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let start = format!("{}/docs/old", mock_server.uri());
    let chain = follow_redirects(&manual_client(), &start, 10, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(chain.hop_count(), 1);
    assert_eq!(chain.hops[0].status, 302);
    assert_eq!(chain.final_url, format!("{}/docs/new", mock_server.uri()));
    assert_eq!(chain.final_status, 200);
}

#[tokio::test]
async fn test_redirect_without_location_ends_chain() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(301))
        .mount(&mock_server)
        .await;

    let start = format!("{}/broken", mock_server.uri());
    let chain = follow_redirects(&manual_client(), &start, 10, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(chain.hop_count(), 0);
    assert_eq!(chain.final_url, start);
    assert_eq!(chain.final_status, 301);
}

#[tokio::test]
async fn test_fetch_page_follows_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/end"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/end"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/start", mock_server.uri());
    match fetch_page(&following_client(), &url).await {
        FetchResult::Success {
            final_url,
            status_code,
            body,
        } => {
            assert_eq!(final_url, format!("{}/end", mock_server.uri()));
            assert_eq!(status_code, 200);
            assert_eq!(body, "<html></html>");
        }
        FetchResult::NetworkError { error } => panic!("unexpected error: {}", error),
    }
}

#[tokio::test]
async fn test_fetch_page_reports_network_error() {
    let result = fetch_page(&following_client(), "http://127.0.0.1:1/").await;
    assert!(matches!(result, FetchResult::NetworkError { .. }));
}

#[tokio::test]
async fn test_probe_patterns_records_each_outcome() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/plain"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/secure"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let targets = vec![
        (UrlPattern::HttpNoWww, format!("{}/plain", base)),
        (UrlPattern::HttpsWww, format!("{}/secure", base)),
        (UrlPattern::HttpWww, "http://127.0.0.1:1/".to_string()),
    ];

    let report = probe_patterns(&manual_client(), "Homepage", &targets, &fast_crawler()).await;

    assert_eq!(report.results.len(), 3);
    assert!(report.is_consistent());
    assert_eq!(report.long_chains().count(), 0);
    assert!(report.results[0].is_healthy());
    assert_eq!(report.results[0].chain().unwrap().hop_count(), 1);
    assert_eq!(report.results[1].chain().unwrap().hop_count(), 0);
    assert!(matches!(
        report.results[2].outcome,
        PatternOutcome::Failed { .. }
    ));
    assert_eq!(report.results[2].initial_url(), "http://127.0.0.1:1/");
}

#[tokio::test]
async fn test_probe_patterns_flags_divergent_destinations() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/r/\d+$"))
        .respond_with(RedirectLadder { last: 2 })
        .mount(&mock_server)
        .await;

    let targets = vec![
        (UrlPattern::HttpsNoWww, format!("{}/one", base)),
        (UrlPattern::HttpsWww, format!("{}/r/0", base)),
    ];

    let report = probe_patterns(&manual_client(), "Sample page 1 (/one)", &targets, &fast_crawler()).await;

    assert!(!report.is_consistent());
    let long: Vec<UrlPattern> = report.long_chains().map(|r| r.pattern).collect();
    assert_eq!(long, vec![UrlPattern::HttpsWww]);
}
