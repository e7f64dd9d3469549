// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP fetcher tests against a local wiremock server.

use stockwatch_config::ScrapeConfig;
use stockwatch_core::{PageFetcher, ParsedItem, StockParser, StockwatchError};
use stockwatch_scrape::{HttpPageFetcher, RegexStockParser};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpPageFetcher {
    HttpPageFetcher::new(&ScrapeConfig::default()).unwrap()
}

#[tokio::test]
async fn fetch_sends_browser_headers_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("user-agent", "Mozilla/5.0"))
        .and(header("accept-language", "zh-CN,zh;q=0.9"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h4>HK</h4>库存：3"))
        .expect(1)
        .mount(&server)
        .await;

    let body = fetcher()
        .fetch(&format!("{}/cart", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<h4>HK</h4>库存：3");
}

#[tokio::test]
async fn non_success_status_is_fetch_error_with_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let url = format!("{}/cart", server.uri());
    let err = fetcher().fetch(&url).await.unwrap_err();
    match err {
        StockwatchError::Fetch {
            url: failed, message, ..
        } => {
            assert_eq!(failed, url);
            assert_eq!(message, "HTTP 503");
        }
        other => panic!("expected fetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_fetch_error() {
    // Nothing listens on port 9 of localhost in the test environment.
    let err = fetcher().fetch("http://127.0.0.1:9/").await.unwrap_err();
    assert!(matches!(err, StockwatchError::Fetch { .. }));
}

#[tokio::test]
async fn fetched_page_parses_into_items() {
    let server = MockServer::start().await;
    let page = r#"
        <div class="plan"><h4 class="name">HK-Mini</h4><p>库存：0</p></div>
        <div class="plan"><h4 class="name">JP-Pro</h4><p>库存：6</p></div>
    "#;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    let body = fetcher().fetch(&server.uri()).await.unwrap();
    let parser = RegexStockParser::from_config(&ScrapeConfig::default()).unwrap();
    let items = parser.parse(&body, Some(r#"<h4 class="name">([^<]+)</h4>"#));
    assert_eq!(
        items,
        vec![ParsedItem::new("HK-Mini", 0), ParsedItem::new("JP-Pro", 6)]
    );
}
