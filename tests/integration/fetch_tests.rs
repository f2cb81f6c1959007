//! Batch fetching: aggregation, content-type dispatch, retries, cancellation

use crate::common::{mount_open_robots, mount_text, test_config, url};
use async_trait::async_trait;
use chew::crawler::{LimiterError, RateLimiter, TokenBucket};
use chew::{CancellationToken, ChewError, Chunk, Coordinator};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_endpoints_two_chunks() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/a", "alpha").await;
    mount_text(&server, "/b", "beta").await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let locators = [url(&server, "/a"), url(&server, "/b")];
    let mut chunks = coordinator
        .process(&CancellationToken::new(), &locators)
        .await
        .unwrap();

    chunks.sort_by(|x, y| x.content.cmp(&y.content));
    assert_eq!(
        chunks,
        vec![
            Chunk::new("alpha", url(&server, "/a")),
            Chunk::new("beta", url(&server, "/b")),
        ]
    );
}

#[tokio::test]
async fn test_declared_html_wins_over_extension() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/page.json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<html><body><h1>Title</h1><p>Body text</p></body></html>",
            "text/html; charset=utf-8",
        ))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/page.json")])
        .await
        .unwrap();

    let contents: Vec<_> = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["Title", "Body text"]);
}

#[tokio::test]
async fn test_unknown_type_falls_back_to_extension() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"k":1}"#, "application/octet-stream"),
        )
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/data.json")])
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "{\n  \"k\": 1\n}");
}

#[tokio::test]
async fn test_unsupported_content_type() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.retry.limit = 3;
    let coordinator = Coordinator::new(config).unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/image")])
        .await;

    match result {
        Err(ChewError::UnsupportedContentType { content_type }) => assert_eq!(content_type, "image/png"),
        other => panic!("expected UnsupportedContentType, got {:?}", other),
    }
}

#[tokio::test]
async fn test_retry_recovers_within_limit() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_text(&server, "/flaky", "finally").await;

    let mut config = test_config();
    config.retry.limit = 2;
    let coordinator = Coordinator::new(config).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/flaky")])
        .await
        .unwrap();

    assert_eq!(chunks, vec![Chunk::new("finally", url(&server, "/flaky"))]);
}

/// Counts permits and never blocks
#[derive(Default)]
struct CountingLimiter {
    waits: AtomicUsize,
}

#[async_trait]
impl RateLimiter for CountingLimiter {
    async fn wait(&self, _cancel: &CancellationToken) -> Result<(), LimiterError> {
        self.waits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_retries_skip_admission_and_politeness() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("ok", "text/plain"))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.retry.limit = 2;
    // A crawl-delay slot per retry would push this batch past two seconds
    config.politeness.crawl_delay_ms = 1000;
    let limiter = Arc::new(CountingLimiter::default());
    let coordinator = Coordinator::builder(config)
        .rate_limiter(limiter.clone())
        .build()
        .unwrap();

    let started = Instant::now();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/flaky")])
        .await
        .unwrap();

    assert_eq!(chunks, vec![Chunk::new("ok", url(&server, "/flaky"))]);
    assert_eq!(limiter.waits.load(Ordering::SeqCst), 1);
    assert!(started.elapsed() < Duration::from_millis(900));
}

#[tokio::test]
async fn test_source_label_is_the_given_locator() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/", "root page").await;

    // No trailing slash; the parsed URL would add one
    let locator = server.uri();
    let coordinator = Coordinator::new(test_config()).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[locator.as_str()])
        .await
        .unwrap();

    assert_eq!(chunks, vec![Chunk::new("root page", locator)]);
}

#[tokio::test]
async fn test_retry_exhausted_returns_last_error() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = test_config();
    config.retry.limit = 1;
    let coordinator = Coordinator::new(config).unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/broken")])
        .await;

    assert!(matches!(result, Err(ChewError::HttpStatus { status_code: 503, .. })));
}

#[tokio::test]
async fn test_first_error_aborts_batch() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/good", "fine").await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let result = coordinator
        .process(
            &CancellationToken::new(),
            &[url(&server, "/good"), url(&server, "/missing")],
        )
        .await;

    assert!(matches!(result, Err(ChewError::HttpStatus { status_code: 404, .. })));
}

#[tokio::test]
async fn test_cancellation_returns_promptly() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = coordinator.process(&cancel, &[url(&server, "/slow")]).await;

    assert!(matches!(result, Err(ChewError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
}

struct Exhausted;

#[async_trait]
impl RateLimiter for Exhausted {
    async fn wait(&self, _cancel: &CancellationToken) -> Result<(), LimiterError> {
        Err(LimiterError::Rejected("no permits left".to_string()))
    }
}

#[tokio::test]
async fn test_limiter_failure_blocks_fetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::builder(test_config())
        .rate_limiter(Arc::new(Exhausted))
        .build()
        .unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/page")])
        .await;

    assert!(matches!(result, Err(ChewError::RateLimitExceeded { .. })));
}

#[tokio::test]
async fn test_rate_limit_spaces_admissions() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    for page in ["/1", "/2", "/3"] {
        mount_text(&server, page, page).await;
    }

    let coordinator = Coordinator::new(test_config()).unwrap();
    coordinator.set_rate_limiter(Arc::new(TokenBucket::new(Duration::from_millis(100), 1)));

    let locators: Vec<String> = ["/1", "/2", "/3"].iter().map(|p| url(&server, p)).collect();
    let started = Instant::now();
    let chunks = coordinator
        .process(&CancellationToken::new(), &locators)
        .await
        .unwrap();

    assert_eq!(chunks.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(180));
}

#[tokio::test]
async fn test_custom_client_is_used() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/page", "via custom client").await;

    let client = reqwest::Client::builder().build().unwrap();
    let coordinator = Coordinator::builder(test_config())
        .http_client(client)
        .build()
        .unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/page")])
        .await
        .unwrap();

    assert_eq!(chunks[0].content, "via custom client");
}

#[tokio::test]
async fn test_local_and_remote_mixed() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/remote", "from the web").await;

    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    write!(file, "from disk").unwrap();
    let local = format!("file://{}", file.path().display());

    let coordinator = Coordinator::new(test_config()).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[local.clone(), url(&server, "/remote")])
        .await
        .unwrap();

    assert_eq!(chunks.len(), 2);
    assert!(chunks.contains(&Chunk::new("from disk", local)));
    assert!(chunks.contains(&Chunk::new("from the web", url(&server, "/remote"))));
}

#[tokio::test]
async fn test_concurrent_process_calls() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/x", "x").await;
    mount_text(&server, "/y", "y").await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let first = coordinator.clone();
    let second = coordinator.clone();
    let (x, y) = (url(&server, "/x"), url(&server, "/y"));

    let (xs, ys) = ([x], [y]);
    let cancel = CancellationToken::new();
    let (a, b) = tokio::join!(first.process(&cancel, &xs), second.process(&cancel, &ys));

    assert_eq!(a.unwrap()[0].content, "x");
    assert_eq!(b.unwrap()[0].content, "y");
}
