//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing and detail pages and run the
//! full crawl, and the crawl-then-reconcile cycle, end-to-end.

use shelf_feed::config::{Config, FeedConfig, FetchConfig, SourceConfig, StorageConfig};
use shelf_feed::crawler::Crawler;
use shelf_feed::reconcile::reconcile;
use shelf_feed::storage::{open_store, Store};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, pages: u32, db_path: &str) -> Config {
    Config {
        source: SourceConfig {
            base_url: format!("{}/zgbs?pg=", base_url),
            pages,
            synopsis_limit: 32,
        },
        fetch: FetchConfig {
            user_agent: "TestAgent/1.0".to_string(),
            timeout_secs: 1,
            retry_attempts: 2,
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
            lock_timeout_secs: 5,
        },
        feed: FeedConfig::default(),
    }
}

/// Listing page markup for `(identity, title)` pairs, ranked in order
fn listing_page(first_rank: usize, entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .enumerate()
        .map(|(i, (identity, title))| {
            format!(
                r#"<div class="zg_itemImmersion">
                    <div class="zg_rankDiv"><span class="zg_rankNumber">{rank}.</span></div>
                    <div class="zg_image"><img src="/images/I/{identity}._SL160_.png"></div>
                    <div class="zg_title"><a href="/dp/{identity}">{title}</a></div>
                    <div class="zg_byline">by Author {rank}</div>
                    <div class="zg_reviews"><span class="a-icon-alt">4.{rank} out of 5 stars</span></div>
                    <div class="zg_price"><strong class="price">Free</strong></div>
                </div>"#,
                rank = first_rank + i,
                identity = identity,
                title = title
            )
        })
        .collect();
    format!("<html><body><div id=\"zg_centerListWrapper\">{}</div></body></html>", items)
}

fn detail_page(identity: &str) -> String {
    format!(
        r#"<html><body>
        <div id="bookDescription_feature_div">
            <noscript><div>The <em>long</em> description of {identity}, which goes on and on.</div></noscript>
        </div>
        <div id="detail_bullets_id"><ul>
            <li><b>Print Length:</b> 300 pages</li>
            <li><b>ASIN:</b> {identity}</li>
        </ul></div>
        </body></html>"#,
        identity = identity
    )
}

async fn mount_listing(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/zgbs"))
        .and(query_param("pg", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, identity: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/dp/{}", identity).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail_page(identity)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_across_pages() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(1, &[("B001", "First"), ("B002", "Second")])).await;
    mount_listing(&server, 2, listing_page(3, &[("B003", "Third")])).await;
    for identity in ["B001", "B002", "B003"] {
        mount_detail(&server, identity).await;
    }

    let config = create_test_config(&server.uri(), 2, "unused.db");
    let crawler = Crawler::from_config(&config).expect("Failed to build crawler");
    let records = crawler.crawl().await;

    let identities: Vec<&str> = records.iter().map(|r| r.identity.as_str()).collect();
    assert_eq!(identities, vec!["B001", "B002", "B003"]);

    let first = &records[0];
    assert_eq!(first.rank, "1.");
    assert_eq!(first.title, "First");
    assert_eq!(first.byline, "by Author 1");
    assert_eq!(first.review, "4.1 out of 5 stars");
    assert_eq!(first.price, "Free");
    assert_eq!(first.link, format!("{}/dp/B001", server.uri()));
    assert_eq!(first.image, format!("{}/images/I/B001.jpg", server.uri()));
    assert_eq!(first.synopsis, "The long description of B001, wh...");

    for pair in records.windows(2) {
        assert!(pair[0].created_at > pair[1].created_at);
    }
}

#[tokio::test]
async fn test_crawl_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zgbs"))
        .and(header("user-agent", "TestAgent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, &[])))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 1, "unused.db");
    let records = Crawler::from_config(&config).unwrap().crawl().await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_item_without_identity_is_excluded() {
    let server = MockServer::start().await;
    mount_listing(&server, 1, listing_page(1, &[("B001", "Kept"), ("NOID", "Nameless")])).await;
    mount_detail(&server, "B001").await;
    Mock::given(method("GET"))
        .and(path("/dp/NOID"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><ul><li>Publisher: Nobody</li></ul></body></html>"),
        )
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 1, "unused.db");
    let records = Crawler::from_config(&config).unwrap().crawl().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity, "B001");
}

#[tokio::test]
async fn test_http_error_pages_are_still_parsed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zgbs"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_string(listing_page(1, &[("B001", "Served anyway")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dp/B001"))
        .respond_with(ResponseTemplate::new(404).set_body_string(detail_page("B001")))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), 1, "unused.db");
    let records = Crawler::from_config(&config).unwrap().crawl().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Served anyway");
}

#[tokio::test]
async fn test_listing_timeout_is_retried() {
    let server = MockServer::start().await;

    // First request stalls past the 1s client timeout, the retry succeeds
    Mock::given(method("GET"))
        .and(path("/zgbs"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_listing(&server, 1, listing_page(1, &[("B001", "Patient")])).await;
    mount_detail(&server, "B001").await;

    let config = create_test_config(&server.uri(), 1, "unused.db");
    let records = Crawler::from_config(&config).unwrap().crawl().await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].identity, "B001");
}

#[tokio::test]
async fn test_unreachable_source_yields_empty_crawl() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let mut config = create_test_config(&uri, 2, "unused.db");
    config.fetch.retry_attempts = 1;
    let records = Crawler::from_config(&config).unwrap().crawl().await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_crawl_and_reconcile_cycle() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("shelf.db");
    let server = MockServer::start().await;

    for identity in ["B001", "B002", "B003", "B004"] {
        mount_detail(&server, identity).await;
    }
    mount_listing(
        &server,
        1,
        listing_page(1, &[("B001", "A"), ("B002", "B"), ("B003", "C")]),
    )
    .await;

    let config = create_test_config(&server.uri(), 1, db_path.to_str().unwrap());
    let crawler = Crawler::from_config(&config).unwrap();
    let mut store = open_store(&config.storage).unwrap();

    // First run fills the store
    let report = reconcile(&mut store, &crawler.crawl().await).unwrap();
    assert_eq!(report.added.len(), 3);

    let feed: Vec<String> = store.load_items().unwrap().into_iter().map(|r| r.identity).collect();
    assert_eq!(feed, vec!["B001", "B002", "B003"]);

    // B001 drops off, B004 arrives
    server.reset().await;
    for identity in ["B001", "B002", "B003", "B004"] {
        mount_detail(&server, identity).await;
    }
    mount_listing(
        &server,
        1,
        listing_page(1, &[("B002", "B"), ("B003", "C"), ("B004", "D")]),
    )
    .await;

    let report = reconcile(&mut store, &crawler.crawl().await).unwrap();
    assert_eq!(report.removed, vec!["B001"]);
    assert_eq!(report.added, vec!["B004"]);
    assert!(store.is_retired("B001").unwrap());

    // B001 comes back to the top; it stays retired
    server.reset().await;
    for identity in ["B001", "B002", "B003", "B004"] {
        mount_detail(&server, identity).await;
    }
    mount_listing(
        &server,
        1,
        listing_page(1, &[("B001", "A"), ("B002", "B"), ("B003", "C"), ("B004", "D")]),
    )
    .await;

    let report = reconcile(&mut store, &crawler.crawl().await).unwrap();
    assert_eq!(report.suppressed, vec!["B001"]);
    assert!(report.added.is_empty());
    assert!(report.removed.is_empty());

    let mut stored = store.stored_identities().unwrap();
    stored.sort();
    assert_eq!(stored, vec!["B002", "B003", "B004"]);
}
