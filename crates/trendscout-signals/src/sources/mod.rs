//! Signal collectors.
//!
//! Each source turns third-party responses into [`Topic`]s. A failing source
//! contributes no topics and never aborts the run; [`SignalCollector::collect`]
//! records what happened to each one in a [`SourceReport`].

mod fetch;
mod hackernews;
mod news_api;
mod reddit;
mod rss;
mod rss_helpers;
mod trends;

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use trendscout_core::{AppConfig, Registry};

use crate::error::SignalError;
use crate::scorer::score_controversy;
use crate::types::Topic;

pub use rss_helpers::{parse_feed, FeedItem};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// The signal sources, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    GoogleTrends,
    Reddit,
    NewsApi,
    HackerNews,
    Rss,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::GoogleTrends,
        SourceKind::Reddit,
        SourceKind::NewsApi,
        SourceKind::HackerNews,
        SourceKind::Rss,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::GoogleTrends => "google_trends",
            SourceKind::Reddit => "reddit",
            SourceKind::NewsApi => "news_api",
            SourceKind::HackerNews => "hackernews",
            SourceKind::Rss => "rss",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            SourceKind::GoogleTrends => "interest and related queries for category seeds",
            SourceKind::Reddit => "hot posts in AI subreddits",
            SourceKind::NewsApi => "recent articles per AI tool",
            SourceKind::HackerNews => "top stories mentioning AI tools",
            SourceKind::Rss => "AI news feeds",
        }
    }

    /// Whether the source can run with `config`. Only Reddit and NewsAPI need
    /// credentials.
    #[must_use]
    pub fn is_configured(self, config: &AppConfig) -> bool {
        match self {
            SourceKind::Reddit => config.reddit_credentials().is_some(),
            SourceKind::NewsApi => config.news_api_key.is_some(),
            SourceKind::GoogleTrends | SourceKind::HackerNews | SourceKind::Rss => true,
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base URLs of the third-party services. Tests point these at a mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub google_trends: String,
    pub reddit_auth: String,
    pub reddit_api: String,
    pub news_api: String,
    pub hackernews: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            google_trends: "https://trends.google.com".to_string(),
            reddit_auth: "https://www.reddit.com".to_string(),
            reddit_api: "https://oauth.reddit.com".to_string(),
            news_api: "https://newsapi.org".to_string(),
            hackernews: "https://hacker-news.firebaseio.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Every service at one base URL.
    #[must_use]
    pub fn all_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            google_trends: base.clone(),
            reddit_auth: base.clone(),
            reddit_api: base.clone(),
            news_api: base.clone(),
            hackernews: base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Collected(usize),
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub source: SourceKind,
    pub outcome: SourceOutcome,
}

/// Topics from every source plus one report per source.
#[derive(Debug, Default)]
pub struct Collection {
    pub topics: Vec<Topic>,
    pub reports: Vec<SourceReport>,
}

#[derive(Clone)]
struct RedditCredentials {
    client_id: String,
    client_secret: String,
    user_agent: String,
}

/// Runs the collectors sequentially with one shared HTTP client.
pub struct SignalCollector {
    client: Client,
    endpoints: Endpoints,
    delay: Duration,
    per_source_limit: usize,
    seeds_per_category: usize,
    news_api_key: Option<String>,
    reddit: Option<RedditCredentials>,
}

impl SignalCollector {
    /// A collector pointed at the production services.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, SignalError> {
        Self::with_endpoints(config, Endpoints::default())
    }

    /// A collector with custom service URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the HTTP client cannot be built.
    pub fn with_endpoints(config: &AppConfig, endpoints: Endpoints) -> Result<Self, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let reddit = config
            .reddit_credentials()
            .map(|(client_id, client_secret)| RedditCredentials {
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
                user_agent: config.reddit_user_agent.clone(),
            });

        Ok(Self {
            client,
            endpoints,
            delay: Duration::from_millis(config.inter_request_delay_ms),
            per_source_limit: config.per_source_limit,
            seeds_per_category: config.trends_seeds_per_category,
            news_api_key: config.news_api_key.clone(),
            reddit,
        })
    }

    /// Run every source in order. Never fails; see the reports for outcomes.
    pub async fn collect(&self, registry: &Registry, now: DateTime<Utc>) -> Collection {
        let mut collection = Collection::default();

        for kind in SourceKind::ALL {
            let outcome = match self.collect_from(kind, registry, now).await {
                Ok(topics) => {
                    tracing::info!(source = kind.as_str(), count = topics.len(), "collected topics");
                    let count = topics.len();
                    collection.topics.extend(topics);
                    SourceOutcome::Collected(count)
                }
                Err(e @ SignalError::MissingCredentials(_)) => {
                    tracing::info!(source = kind.as_str(), reason = %e, "source skipped");
                    SourceOutcome::Skipped(e.to_string())
                }
                Err(e) => {
                    tracing::warn!(source = kind.as_str(), error = %e, "source failed");
                    SourceOutcome::Failed(e.to_string())
                }
            };
            collection.reports.push(SourceReport {
                source: kind,
                outcome,
            });
        }

        collection
    }

    /// Run one source, score its topics and apply the per-source limit.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::MissingCredentials`] when the source is not
    /// configured, or the source's fetch/parse error.
    pub async fn collect_from(
        &self,
        kind: SourceKind,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let mut topics = match kind {
            SourceKind::GoogleTrends => self.collect_trends(registry, now).await?,
            SourceKind::Reddit => self.collect_reddit(registry, now).await?,
            SourceKind::NewsApi => self.collect_news(registry, now).await?,
            SourceKind::HackerNews => self.collect_hackernews(registry, now).await?,
            SourceKind::Rss => self.collect_rss(registry, now).await?,
        };
        score_controversy(&mut topics, &registry.controversy);
        Ok(keep_top(topics, self.per_source_limit))
    }

    /// Sleep between requests to the same source.
    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Highest `score + controversy_score` first, discovery order on ties;
/// `limit == 0` keeps all.
fn keep_top(mut topics: Vec<Topic>, limit: usize) -> Vec<Topic> {
    topics.sort_by_key(|t| std::cmp::Reverse(t.score.saturating_add(t.controversy_score)));
    if limit > 0 {
        topics.truncate(limit);
    }
    topics
}

/// Tracks per-target results for sources that query several targets
/// (seeds, subreddits, tools, stories, feeds). The source fails only when every
/// target failed.
struct Attempts {
    source: &'static str,
    succeeded: usize,
    last_error: Option<SignalError>,
}

impl Attempts {
    fn new(source: &'static str) -> Self {
        Self {
            source,
            succeeded: 0,
            last_error: None,
        }
    }

    fn record<T>(&mut self, what: &str, result: Result<T, SignalError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                tracing::warn!(source = self.source, item = what, error = %e, "request failed, skipping");
                self.last_error = Some(e);
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, SignalError> {
        match self.last_error {
            Some(e) if self.succeeded == 0 => Err(e),
            _ => Ok(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(keyword: &str, score: u32) -> Topic {
        Topic::new(keyword, "hackernews", score, Vec::new())
    }

    #[test]
    fn keep_top_sorts_and_truncates() {
        let kept = keep_top(vec![topic("a", 10), topic("b", 90), topic("c", 50)], 2);
        let names: Vec<&str> = kept.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn keep_top_zero_limit_keeps_all_in_stable_order() {
        let kept = keep_top(vec![topic("a", 50), topic("b", 50), topic("c", 70)], 0);
        let names: Vec<&str> = kept.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn keep_top_counts_controversy() {
        let mut heated = topic("ChatGPT", 40);
        heated.controversy_score = 30;
        let kept = keep_top(vec![topic("Gemini", 60), heated, topic("Claude", 75)], 2);
        let names: Vec<&str> = kept.iter().map(|t| t.keyword.as_str()).collect();
        assert_eq!(names, vec!["Claude", "ChatGPT"]);
    }

    #[test]
    fn attempts_fail_only_when_everything_failed() {
        let mut all_failed = Attempts::new("rss");
        let _ = all_failed.record::<()>("a", Err(SignalError::MissingCredentials("x")));
        assert!(all_failed.finish(()).is_err());

        let mut partial = Attempts::new("rss");
        let _ = partial.record::<()>("a", Err(SignalError::MissingCredentials("x")));
        assert_eq!(partial.record("b", Ok(3)), Some(3));
        assert!(partial.finish(()).is_ok());

        assert!(Attempts::new("rss").finish(()).is_ok());
    }

    #[test]
    fn source_names_follow_collection_order() {
        let names: Vec<&str> = SourceKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["google_trends", "reddit", "news_api", "hackernews", "rss"]
        );
    }

    #[test]
    fn endpoints_all_at_strips_trailing_slash() {
        let endpoints = Endpoints::all_at("http://127.0.0.1:9000/");
        assert_eq!(endpoints.hackernews, "http://127.0.0.1:9000");
        assert_eq!(endpoints.reddit_auth, "http://127.0.0.1:9000");
    }
}
