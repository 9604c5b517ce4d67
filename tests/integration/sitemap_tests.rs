//! Sitemap discovery and consistency tests

use crate::common::{following_client, sitemap_body};
use siteprobe::probe::check_sitemap;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_http_urls_in_sitemap_reported() {
    let mock_server = MockServer::start().await;

    let locs: Vec<String> = [
        "http://example.com/1",
        "http://example.com/2",
        "http://example.com/3",
        "https://example.com/4",
        "https://example.com/5",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_body(&locs)))
        .mount(&mock_server)
        .await;

    let candidates = vec![format!("{}/sitemap.xml", mock_server.uri())];
    let summary = check_sitemap(&following_client(), &candidates)
        .await
        .expect("sitemap should be found");

    assert_eq!(summary.total_urls, 5);
    assert_eq!(summary.http_urls, 3);
    assert_eq!(summary.https_urls, 2);
    assert_eq!(summary.issues.len(), 1);
    assert!(summary.issues[0].contains('3'));
}

#[tokio::test]
async fn test_first_reachable_candidate_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let first = vec!["https://www.example.com/a".to_string()];
    Mock::given(method("GET"))
        .and(path("/first.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_body(&first)))
        .mount(&mock_server)
        .await;

    // Never requested: an earlier candidate answers 200
    Mock::given(method("GET"))
        .and(path("/second.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_body(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let candidates = vec![
        "http://127.0.0.1:1/sitemap.xml".to_string(),
        format!("{}/missing.xml", base),
        format!("{}/first.xml", base),
        format!("{}/second.xml", base),
    ];

    let summary = check_sitemap(&following_client(), &candidates).await.unwrap();
    assert_eq!(summary.url, format!("{}/first.xml", base));
    assert_eq!(summary.total_urls, 1);
    assert!(summary.issues.is_empty());
}

#[tokio::test]
async fn test_no_sitemap_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let candidates = vec![format!("{}/sitemap.xml", mock_server.uri())];
    assert!(check_sitemap(&following_client(), &candidates).await.is_none());
}
