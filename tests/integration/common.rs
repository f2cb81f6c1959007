use chew::config::Config;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USER_AGENT: &str = "ChewTest/1.0";

/// Configuration with every delay shrunk for fast tests
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.user_agent = USER_AGENT.to_string();
    config.retry.limit = 0;
    config.retry.delay_ms = 10;
    config.politeness.crawl_delay_ms = 0;
    config.rate_limit.interval_ms = 0;
    config.transport.timeout_secs = 5;
    config
}

/// Mounts a text/plain page
pub async fn mount_text(server: &MockServer, page: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/plain; charset=utf-8"),
        )
        .mount(server)
        .await;
}

/// Mounts a robots.txt allowing everything
pub async fn mount_open_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(server)
        .await;
}

pub fn url(server: &MockServer, page: &str) -> String {
    format!("{}{}", server.uri(), page)
}
