// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Integration tests for the HTTP crawl engine
//!
//! These tests run `HttpCrawlEngine` against a wiremock server to verify
//! the real fetch path: extraction of page metadata and content, in-band
//! reporting of HTTP error statuses, redirect following, transport-error
//! handling, and the full orchestrator pipeline over live HTTP.

use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use websearch_node::search::{
    CrawlEngine, EngineError, HttpCrawlEngine, SearchConfig, SearchOrchestrator, SearchStatus,
};

const ARTICLE_PAGE: &str = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Tokio by Example</title>
        <meta name="description" content="Worked examples for the Tokio runtime">
        <meta name="keywords" content="rust, tokio, async">
    </head>
    <body>
        <nav><a href="/home">Home</a><a href="/about">About</a></nav>
        <article>
            <h1>Spawning Tasks</h1>
            <p>Tasks are the unit of concurrency in Tokio. This article walks
            through spawning, joining and cancelling them, with enough worked
            detail that the extractor treats it as the main content of the
            page rather than falling back to the full body text.</p>
            <p>Later sections cover semaphores, timeouts and the patterns that
            keep a batch of concurrent jobs well behaved under load.</p>
        </article>
        <footer>
            <a href="https://github.example/tokio">Source</a>
            <img src="/logo.png">
        </footer>
    </body>
    </html>
"#;

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn started_engine() -> HttpCrawlEngine {
    let engine = HttpCrawlEngine::new(&SearchConfig::default());
    engine.start().await.expect("engine should start");
    engine
}

/// Test 1: A live page is fetched and fully extracted
#[tokio::test]
async fn test_fetch_extracts_page_metadata_and_content() {
    let server = MockServer::start().await;
    mount_page(&server, "/article", ARTICLE_PAGE).await;
    let engine = started_engine().await;

    let page = engine
        .fetch(&format!("{}/article", server.uri()))
        .await
        .expect("fetch should succeed");

    assert!(page.success);
    assert_eq!(page.title.as_deref(), Some("Tokio by Example"));
    assert_eq!(
        page.description.as_deref(),
        Some("Worked examples for the Tokio runtime")
    );
    assert_eq!(page.keywords.as_deref(), Some("rust, tokio, async"));

    let content = page.content.expect("article content expected");
    assert!(content.contains("Spawning Tasks"));
    assert!(!content.contains("Home")); // nav is not main content

    // /home and /about resolve to the mock server's host; the github
    // link does not
    assert_eq!(page.internal_links, 2);
    assert_eq!(page.external_links, 1);
    assert_eq!(page.images, 1);
}

/// Test 2: HTTP error statuses are reported in-band, not as engine errors
#[tokio::test]
async fn test_http_error_status_reported_in_band() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let engine = started_engine().await;

    let page = engine
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .expect("a 404 still yields PageContent");

    assert!(!page.success);
    assert_eq!(page.error_message.as_deref(), Some("HTTP 404"));
    assert!(page.title.is_none());
}

/// Test 3: Server errors carry their status in the failure message
#[tokio::test]
async fn test_server_error_status_in_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let engine = started_engine().await;

    let page = engine
        .fetch(&format!("{}/broken", server.uri()))
        .await
        .unwrap();

    assert!(!page.success);
    assert_eq!(page.error_message.as_deref(), Some("HTTP 503"));
}

/// Test 4: Redirects are followed to the final page
#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    let target = format!("{}/new", server.uri());
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", target.as_str()))
        .mount(&server)
        .await;
    mount_page(&server, "/new", ARTICLE_PAGE).await;
    let engine = started_engine().await;

    let page = engine
        .fetch(&format!("{}/old", server.uri()))
        .await
        .unwrap();

    assert!(page.success);
    assert_eq!(page.title.as_deref(), Some("Tokio by Example"));
}

/// Test 5: A dead server is a transport error, not an in-band failure
#[tokio::test]
async fn test_unreachable_server_is_engine_error() {
    // Grab a port the OS just released; nothing listens on it anymore
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let engine = started_engine().await;
    let err = engine
        .fetch(&format!("http://127.0.0.1:{}/page", port))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Request(_)));
}

/// Test 6: The whole pipeline classifies a mixed batch over live HTTP
#[tokio::test]
async fn test_orchestrator_end_to_end_over_http() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", ARTICLE_PAGE).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let config = SearchConfig::default();
    let engine = Arc::new(HttpCrawlEngine::new(&config));
    let orchestrator = SearchOrchestrator::new(config, engine);

    let urls = vec![
        format!("{}/good", server.uri()),
        format!("{}/gone", server.uri()),
    ];
    let outcome = orchestrator
        .search("tokio tasks", &urls, None)
        .await
        .unwrap();

    assert_eq!(outcome.status, SearchStatus::Partial);
    assert_eq!(outcome.total_results, 1);
    assert_eq!(outcome.results[0].title, "Tokio by Example");
    assert_eq!(outcome.results[0].links_count, 3);
    assert_eq!(outcome.errors, vec!["Only 1/2 URLs crawled successfully"]);

    orchestrator.shutdown().await;
}
