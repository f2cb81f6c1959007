//! robots.txt compliance and crawl-delay enforcement

use crate::common::{mount_open_robots, mount_text, test_config, url};
use chew::{CancellationToken, ChewError, Chunk, Coordinator};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_robots(server: &MockServer, body: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_disallowed_path_is_never_fetched() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private\n", 1).await;
    Mock::given(method("GET"))
        .and(path("/private/doc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/private/doc")])
        .await;

    match result {
        Err(ChewError::RobotsDisallowed { url: blocked }) => {
            assert_eq!(blocked, url(&server, "/private/doc"))
        }
        other => panic!("expected RobotsDisallowed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_agent_specific_group_applies() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: ChewTest\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
        1,
    )
    .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/page")])
        .await;

    assert!(matches!(result, Err(ChewError::RobotsDisallowed { .. })));
}

#[tokio::test]
async fn test_ignoring_robots_returns_content_verbatim() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private\n", 0).await;
    mount_text(&server, "/private/doc", "  secret text\n").await;

    let mut config = test_config();
    config.politeness.ignore_robots_txt = true;
    let coordinator = Coordinator::new(config).unwrap();
    let chunks = coordinator
        .process(&CancellationToken::new(), &[url(&server, "/private/doc")])
        .await
        .unwrap();

    assert_eq!(
        chunks,
        vec![Chunk::new("  secret text\n", url(&server, "/private/doc"))]
    );
}

#[tokio::test]
async fn test_robots_cached_across_batches() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /\n", 1).await;
    mount_text(&server, "/one", "1").await;
    mount_text(&server, "/two", "2").await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let cancel = CancellationToken::new();
    coordinator.process(&cancel, &[url(&server, "/one")]).await.unwrap();
    coordinator.process(&cancel, &[url(&server, "/two")]).await.unwrap();
}

#[tokio::test]
async fn test_robots_server_error_disallows_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let cancel = CancellationToken::new();
    for _ in 0..2 {
        let result = coordinator.process(&cancel, &[url(&server, "/page")]).await;
        assert!(matches!(result, Err(ChewError::RobotsDisallowed { .. })));
    }
}

#[tokio::test]
async fn test_robots_network_failure_fails_open() {
    // Nothing listens on the discard port
    let coordinator = Coordinator::new(test_config()).unwrap();
    let result = coordinator
        .process(&CancellationToken::new(), &["http://127.0.0.1:9/page"])
        .await;

    // robots.txt failed open, so the page fetch itself was attempted
    assert!(matches!(result, Err(ChewError::Transport { .. })));
}

#[tokio::test]
async fn test_huge_crawl_delay_stays_cancellable() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: *\nCrawl-delay: 10000000000000000000\n",
        1,
    )
    .await;
    mount_text(&server, "/a", "a").await;
    mount_text(&server, "/b", "b").await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = coordinator
        .process(&cancel, &[url(&server, "/a"), url(&server, "/b")])
        .await;

    assert!(matches!(result, Err(ChewError::Cancelled)));
    assert!(started.elapsed() >= Duration::from_millis(250));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_crawl_delay_spaces_requests_to_one_domain() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    for page in ["/1", "/2", "/3"] {
        mount_text(&server, page, page).await;
    }

    let mut config = test_config();
    config.politeness.crawl_delay_ms = 150;
    let coordinator = Coordinator::new(config).unwrap();

    let locators: Vec<String> = ["/1", "/2", "/3"].iter().map(|p| url(&server, p)).collect();
    let started = Instant::now();
    let chunks = coordinator
        .process(&CancellationToken::new(), &locators)
        .await
        .unwrap();

    assert_eq!(chunks.len(), 3);
    // Three slots: t, t+150ms, t+300ms
    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_robots_crawl_delay_overrides_default() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nCrawl-delay: 1\n", 1).await;
    mount_text(&server, "/a", "a").await;
    mount_text(&server, "/b", "b").await;

    let coordinator = Coordinator::new(test_config()).unwrap();
    let started = Instant::now();
    coordinator
        .process(&CancellationToken::new(), &[url(&server, "/a")])
        .await
        .unwrap();
    coordinator
        .process(&CancellationToken::new(), &[url(&server, "/b")])
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(900));
}

#[tokio::test]
async fn test_cancel_during_crawl_delay() {
    let server = MockServer::start().await;
    mount_open_robots(&server).await;
    mount_text(&server, "/a", "a").await;
    mount_text(&server, "/b", "b").await;

    let mut config = test_config();
    config.politeness.crawl_delay_ms = 30_000;
    let coordinator = Coordinator::new(config).unwrap();
    coordinator
        .process(&CancellationToken::new(), &[url(&server, "/a")])
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = coordinator.process(&cancel, &[url(&server, "/b")]).await;

    assert!(matches!(result, Err(ChewError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(2));
}
