//! Crawl cycle tests against a mock site

use crate::common::{html_page, mock_config, sitemap_body};
use chrono::Local;
use siteprobe::crawler::Auditor;
use siteprobe::output::format_audit_report;
use siteprobe::state::IssueKind;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Every page links to two pages that do not exist yet
struct EndlessSite;

impl Respond for EndlessSite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let current = request.url.path().trim_end_matches('/');
        let left = format!("{}/left", current);
        let right = format!("{}/right", current);
        html_page(200, current, None, &[left.as_str(), right.as_str()])
    }
}

#[tokio::test]
async fn test_crawl_stops_at_page_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(EndlessSite)
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server);
    config.crawler.max_pages = 5;

    let mut auditor = Auditor::new(config, "hash").expect("Failed to create auditor");
    auditor.crawl().await.expect("Crawl failed");

    let session = auditor.session();
    assert_eq!(session.visited.len(), 5);
    assert_eq!(session.pages.len(), 5);

    // FIFO: the root, then its children, then the first grandchildren
    let base = mock_server.uri();
    assert_eq!(session.visited[0], format!("{}/", base));
    assert_eq!(session.visited[1], format!("{}/left", base));
    assert_eq!(session.visited[2], format!("{}/right", base));
    assert_eq!(session.visited[3], format!("{}/left/left", base));
}

#[tokio::test]
async fn test_crawl_never_revisits() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Pages link to each other in every spelling the normalizer folds together
    let home_links = [
        "/a".to_string(),
        "/a/".to_string(),
        format!("{}/a#section", base),
        "/".to_string(),
    ];
    let home_links: Vec<&str> = home_links.iter().map(|s| s.as_str()).collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(200, "Home", None, &home_links))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(200, "A", None, &["/", "/a"]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut auditor = Auditor::new(mock_config(&mock_server), "hash").unwrap();
    auditor.crawl().await.unwrap();

    assert_eq!(
        auditor.session().visited,
        vec![format!("{}/", base), format!("{}/a", base)]
    );
}

#[tokio::test]
async fn test_crawl_records_issues_and_failures() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // No canonical; links to two internal pages and one external page
    let contact = format!("{}/contact", base);
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            200,
            "Home",
            None,
            &["/about", contact.as_str(), "https://other.org/x"],
        ))
        .mount(&mock_server)
        .await;

    // Canonical that does not use the https://www default
    let about_canonical = format!("{}/about", base);
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html_page(200, "About", Some(&about_canonical), &["/"]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html_page(404, "Not Found", None, &[]))
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server);
    // Nothing listens on port 1
    config.site.seeds.push("http://127.0.0.1:1/".to_string());

    let mut auditor = Auditor::new(config, "hash").unwrap();
    auditor.crawl().await.unwrap();
    let session = auditor.session();

    assert_eq!(session.visited.len(), 4);
    assert_eq!(session.pages.len(), 3);
    assert_eq!(session.fetch_failures.len(), 1);
    assert_eq!(session.fetch_failures[0].url, "http://127.0.0.1:1/");

    // Plain HTTP responses never set the preferred format
    assert!(!session.preferred.is_set());

    let home = session.page(&format!("{}/", base)).unwrap();
    assert_eq!(home.status_code, 200);
    assert_eq!(home.title.as_deref(), Some("Home"));
    assert_eq!(
        home.internal_links,
        vec![format!("{}/about", base), format!("{}/contact", base)]
    );

    let contact = session.page(&format!("{}/contact", base)).unwrap();
    assert_eq!(contact.status_code, 404);

    assert_eq!(session.missing_canonicals().count(), 2);
    let wrong: Vec<_> = session.wrong_format_canonicals().collect();
    assert_eq!(wrong.len(), 1);
    assert_eq!(wrong[0].value.as_deref(), Some(about_canonical.as_str()));

    // Every internal link on a plain HTTP site is insecure
    assert_eq!(session.insecure_links().count(), 3);
    assert_eq!(session.www_link_issues().count(), 0);
    assert!(session
        .link_issues
        .iter()
        .all(|i| i.kind == IssueKind::InsecureLink));
}

#[tokio::test]
async fn test_report_from_mock_audit() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(200, "Home", None, &["/page"]))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_page(200, "Page", None, &[]))
        .mount(&mock_server)
        .await;

    let locs = vec![format!("{}/", base), format!("{}/page", base)];
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sitemap_body(&locs)))
        .mount(&mock_server)
        .await;

    let mut auditor = Auditor::new(mock_config(&mock_server), "cafebabe").unwrap();
    auditor.crawl().await.unwrap();
    auditor.check_sitemap().await;

    let session = auditor.session();
    let sitemap = session.sitemap.as_ref().expect("sitemap should be found");
    assert_eq!(sitemap.total_urls, 2);
    assert_eq!(sitemap.http_urls, 2);

    let report = format_audit_report(session, Local::now());
    assert!(report.contains("# Website Audit Report: 127.0.0.1"));
    assert!(report.contains("**Config Hash:** `cafebabe`"));
    assert!(report.contains("- **Pages Crawled:** 2"));
    assert!(report.contains("### Missing Canonical Tags (2 pages)"));
    assert!(report.contains("### HTTP Links (1 instances)"));
    assert!(report.contains("Sitemap contains 2 HTTP URLs (should be HTTPS)"));
    assert!(report.contains("Missing canonical tags [HIGH Priority]"));
    assert!(report.contains(&format!("- [200] {}/page", base)));
}

#[tokio::test]
async fn test_crawl_requests_discovered_url() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(200, "Home", None, &["/docs/", "/docs"]))
        .mount(&mock_server)
        .await;

    // Only the slash-terminated form exists
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html_page(200, "Docs", None, &[]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut auditor = Auditor::new(mock_config(&mock_server), "hash").unwrap();
    auditor.crawl().await.unwrap();
    let session = auditor.session();

    // The visited set holds normalized keys
    assert_eq!(
        session.visited,
        vec![format!("{}/", base), format!("{}/docs", base)]
    );

    let docs = session.page(&format!("{}/docs/", base)).unwrap();
    assert_eq!(docs.status_code, 200);
    assert_eq!(docs.title.as_deref(), Some("Docs"));

    let requested: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(requested, vec!["/", "/docs/"]);
}
