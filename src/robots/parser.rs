//! Robots.txt parser implementation
//!
//! Allow/Disallow matching is delegated to the robotstxt crate; Crawl-delay is
//! not part of its matcher, so it is read here from the user-agent groups.

use robotstxt::DefaultMatcher;
use std::time::Duration;

/// Upper bound on an advertised Crawl-delay
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(86_400);

/// Parsed robots.txt data for one origin
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw robots.txt content; empty means allow everything
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Creates a ParsedRobots that disallows everything for every agent
    pub fn disallow_all() -> Self {
        Self::from_content("User-agent: *\nDisallow: /\n")
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to check; only its path and query are matched
    /// * `user_agent` - The full User-Agent string; its product token is used
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Gets the crawl delay advertised for a user agent
    ///
    /// A group naming the agent's product token takes precedence over the `*`
    /// group. Within a group the first valid Crawl-delay wins.
    ///
    /// # Returns
    ///
    /// * `Some(Duration)` - The advertised delay
    /// * `None` - No usable Crawl-delay applies to this agent
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        let token = product_token(user_agent).to_lowercase();

        let mut group: Vec<String> = Vec::new();
        let mut group_has_rules = false;
        let mut for_agent: Option<Duration> = None;
        let mut for_wildcard: Option<Duration> = None;

        for raw in self.content.lines() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if group_has_rules {
                        group.clear();
                        group_has_rules = false;
                    }
                    group.push(product_token(value).to_lowercase());
                }
                "crawl-delay" => {
                    group_has_rules = true;
                    let Some(delay) = parse_delay(value) else {
                        continue;
                    };
                    for agent in &group {
                        if agent == "*" {
                            for_wildcard.get_or_insert(delay);
                        } else if *agent == token {
                            for_agent.get_or_insert(delay);
                        }
                    }
                }
                _ => group_has_rules = true,
            }
        }

        for_agent.or(for_wildcard)
    }
}

/// Returns the product token of a User-Agent string
///
/// `"MyBot/1.0 (+https://example.com/bot)"` becomes `"MyBot"`; robots.txt
/// groups are matched against this token, not the full header value.
pub fn product_token(user_agent: &str) -> &str {
    let trimmed = user_agent.trim();
    let end = trimmed
        .find(|c: char| c == '/' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

fn parse_delay(value: &str) -> Option<Duration> {
    let secs: f64 = value.parse().ok()?;
    if secs < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(secs)
        .ok()
        .map(|delay| delay.min(MAX_CRAWL_DELAY))
}
