//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use domain_miner::crawler::crawl;
use domain_miner::extract::{ContentRecord, ExtractError, Extractor};
use domain_miner::{CrawlConfig, Crawler, PageRecord, Profile};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the mock server
fn create_test_config(server: &MockServer, dir: &TempDir) -> CrawlConfig {
    let mut config = CrawlConfig::new(format!("{}/", server.uri()), "127.0.0.1");
    config.max_workers = 1;
    config.max_pages = 5;
    config.request_timeout = 5;
    config.output_dir = dir.path().join("data");
    config.log_file = dir.path().join("logs").join("crawler.log");
    config.robots_url = Some(format!("{}/robots.txt", server.uri()));
    config
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

/// Fails on the start page, keeps every other page as a content record
struct FailOnIndex;

impl Extractor for FailOnIndex {
    fn profile(&self) -> Profile {
        Profile::Content
    }

    fn extract(&self, url: &str, _html: &str) -> Result<Option<PageRecord>, ExtractError> {
        if url.ends_with('/') {
            return Err(ExtractError::Malformed("unterminated table".to_string()));
        }
        Ok(Some(PageRecord::Content(ContentRecord {
            url: url.to_string(),
            text: "A page with enough text to be kept".to_string(),
        })))
    }
}

/// Panics on `/boom`, extracts nothing anywhere else
struct PanicOnBoom;

impl Extractor for PanicOnBoom {
    fn profile(&self) -> Profile {
        Profile::Contacts
    }

    fn extract(&self, url: &str, _html: &str) -> Result<Option<PageRecord>, ExtractError> {
        if url.ends_with("/boom") {
            panic!("extractor blew up on {}", url);
        }
        Ok(None)
    }
}

async fn mount_page(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<p>Pište na info@test.cz</p>
        <a href="/a">A</a>
        <a href="https://other.com/b">Elsewhere</a>"#,
    )
    .await;
    mount_page(&server, "/a", "<p>Volejte +420 777 123 456</p>").await;

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::new(create_test_config(&server, &dir)).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.fetch_failures, 0);
    assert_eq!(summary.records_kept, 2);
    assert!(summary.finished_early);

    let records = crawler.results().records();
    assert_eq!(records.len(), 2);

    match &records[0] {
        PageRecord::Contacts(record) => {
            assert_eq!(record.url, format!("{}/", server.uri()));
            assert_eq!(record.emails, vec!["info@test.cz"]);
        }
        other => panic!("unexpected record: {:?}", other),
    }
    match &records[1] {
        PageRecord::Contacts(record) => {
            assert_eq!(record.url, format!("{}/a", server.uri()));
            assert_eq!(record.phones, vec!["+420777123456"]);
        }
        other => panic!("unexpected record: {:?}", other),
    }
}

#[tokio::test]
async fn test_page_cap_respected() {
    let server = MockServer::start().await;

    let links: String = (1..=9)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&links))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/p\d+$"))
        .respond_with(html(&links))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.max_pages = 3;
    config.max_workers = 3;

    let crawler = Crawler::new(config).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(crawler.page_count(), 3);
    assert!(!summary.finished_early);

    let requests = server.received_requests().await.unwrap();
    let page_requests = requests
        .iter()
        .filter(|r| r.url.path() != "/robots.txt")
        .count();
    assert_eq!(page_requests, 3);
}

#[tokio::test]
async fn test_robots_disallow_and_crawl_delay() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow: /private\nCrawl-delay: 0.2\n"),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/private/x">Secret</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&server, "/public", "<p>nothing</p>").await;
    Mock::given(method("GET"))
        .and(path("/private/x"))
        .respond_with(html("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::new(create_test_config(&server, &dir)).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert!(summary.elapsed >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_fetch_failure_consumes_slot() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>fine</p>").await;

    let dir = TempDir::new().unwrap();
    let crawler = Crawler::new(create_test_config(&server, &dir)).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 3);
    assert_eq!(summary.fetch_failures, 1);
    assert!(summary.success_rate() < 100.0);

    let log = std::fs::read_to_string(dir.path().join("logs").join("crawler.log")).unwrap();
    assert!(log.contains("ERROR"));
    assert!(log.contains("/broken"));
}

#[tokio::test]
async fn test_queue_full_drops_links() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#,
    )
    .await;
    mount_page(&server, "/a", "<p>a</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.queue_capacity = 1;

    let crawler = Crawler::new(config).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.links_dropped, 2);
}

#[tokio::test]
async fn test_save_html_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.save_html = true;

    let crawler = Crawler::new(config).unwrap();
    crawler.run().await.unwrap();

    let saved = std::fs::read_to_string(dir.path().join("data").join("0001_index.html")).unwrap();
    assert!(saved.starts_with(&format!("<!-- URL: {}/ -->\n", server.uri())));
    assert!(saved.contains("<p>home</p>"));
}

#[tokio::test]
async fn test_log_file_written() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>home</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.max_workers = 2;

    let crawler = Crawler::new(config).unwrap();
    crawler.run().await.unwrap();

    let log = std::fs::read_to_string(dir.path().join("logs").join("crawler.log")).unwrap();

    assert!(log.contains("[WORKER-1] Start worker"));
    assert!(log.contains("[WORKER-2] Start worker"));
    assert!(log.contains("[WORKER-1] stopped"));
    assert!(log.contains("[WORKER-2] stopped"));
    assert!(log.contains("[CRAWLER] Crawl finished"));
    assert!(log.lines().all(|line| line.contains(" | [")));

    // Every worker stops before the final coordinator line is written
    let last_stop = log.rfind("stopped").unwrap();
    let finished = log.find("Crawl finished").unwrap();
    assert!(last_stop < finished);
}

#[tokio::test]
async fn test_save_results_seo() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(
                r#"<html><head><title>Úvod</title>
                <meta name="description" content="Popis stránky">
                </head><body><h1>Nadpis</h1><a href="/empty">x</a></body></html>"#,
            ),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/empty", "<p>no title here</p>").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.profile = Profile::Seo;

    let crawler = Crawler::new(config).unwrap();
    let summary = crawler.run().await.unwrap();
    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.records_kept, 1);

    let path = crawler.save_results().unwrap();
    assert_eq!(path, dir.path().join("data").join("seo_data.json"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Úvod"));

    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    let records = json.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["title"], "Úvod");
    assert_eq!(records[0]["meta_description"], "Popis stránky");
    assert_eq!(records[0]["headings"][0], "Nadpis");
}

#[tokio::test]
async fn test_crawl_entry_point() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<p>Dlouhý text stránky, který rozhodně přesahuje dvacet znaků.</p>",
    )
    .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir);
    config.profile = Profile::Content;

    let (summary, path) = crawl(config).await.unwrap();

    assert_eq!(summary.records_kept, 1);
    assert!(path.ends_with("content_data.json"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(json[0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Dlouhý text stránky"));
}

#[tokio::test]
async fn test_extract_error_still_discovers_links() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">A</a>"#).await;
    mount_page(&server, "/a", "<p>child</p>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let crawler = Crawler::with_extractor(config, Arc::new(FailOnIndex)).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.extract_failures, 1);
    assert_eq!(summary.records_kept, 1);

    let records = crawler.results().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url(), format!("{}/a", server.uri()));

    let log = std::fs::read_to_string(dir.path().join("logs").join("crawler.log")).unwrap();
    assert!(log.contains("EXTRACT ERROR"));
    assert!(log.contains("unterminated table"));

    assert!(crawler
        .save_results()
        .unwrap()
        .ends_with("content_data.json"));
}

#[tokio::test]
async fn test_panicking_page_does_not_stop_worker() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/boom">Boom</a><a href="/x">X</a><a href="/y">Y</a>"#,
    )
    .await;
    mount_page(&server, "/boom", "<p>boom</p>").await;
    mount_page(&server, "/x", "<p>x</p>").await;
    mount_page(&server, "/y", "<p>y</p>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir);

    let crawler = Crawler::with_extractor(config, Arc::new(PanicOnBoom)).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(10), crawler.run())
        .await
        .expect("crawl stalled after a panicking page")
        .unwrap();

    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.page_panics, 1);
    assert!(summary.finished_early);

    let log = std::fs::read_to_string(dir.path().join("logs").join("crawler.log")).unwrap();
    assert!(log.contains("PANIC"));
    assert!(log.contains("extractor blew up"));
    assert!(log.contains("[WORKER-1] stopped"));
    assert!(!log.contains("ended abnormally"));
}
