//! NewsAPI collector: recent popular articles for the leading tools.

use chrono::{DateTime, Duration, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use trendscout_core::Registry;

use super::fetch::parse_json;
use super::{Attempts, SignalCollector};
use crate::error::SignalError;
use crate::text;
use crate::types::Topic;

const SOURCE: &str = "news_api";
const TOOLS_QUERIED: usize = 5;
const PAGE_SIZE: u32 = 5;
const LOOKBACK_DAYS: i64 = 7;
const UNKNOWN_FRESHNESS: u32 = 50;
const WIRE_SOURCE_WEIGHT: u32 = 80;
const DEFAULT_SOURCE_WEIGHT: u32 = 50;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: String,
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Article {
    #[serde(default)]
    source: ArticleSource,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ArticleSource {
    name: Option<String>,
}

impl SignalCollector {
    pub(super) async fn collect_news(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let api_key = self
            .news_api_key
            .as_deref()
            .ok_or(SignalError::MissingCredentials("NewsAPI"))?;

        let mut attempts = Attempts::new(SOURCE);
        let mut topics = Vec::new();

        for (i, tool) in registry.tools.iter().take(TOOLS_QUERIED).enumerate() {
            if i > 0 {
                self.pause().await;
            }
            let result = self.tool_articles(tool, api_key, now).await;
            if let Some(articles) = attempts.record(tool, result) {
                topics.extend(
                    articles
                        .into_iter()
                        .map(|article| article_topic(article, tool, registry, now)),
                );
            }
        }

        attempts.finish(topics)
    }

    async fn tool_articles(
        &self,
        tool: &str,
        api_key: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, SignalError> {
        let query = utf8_percent_encode(&format!("\"{tool}\""), NON_ALPHANUMERIC).to_string();
        let from = (now - Duration::days(LOOKBACK_DAYS)).format("%Y-%m-%d");
        let url = format!(
            "{}/v2/everything?q={query}&language=en&sortBy=popularity&pageSize={PAGE_SIZE}&from={from}",
            self.endpoints.news_api
        );

        let response = self
            .client
            .get(url)
            .header("X-Api-Key", api_key)
            .send()
            .await?;
        let status = response.status();
        let request_url = response.url().to_string();
        let body = response.text().await?;

        // Error bodies carry a message worth surfacing, whatever the status.
        if let Ok(envelope) = parse_json::<Envelope>(&body, SOURCE) {
            if envelope.status == "error" {
                return Err(SignalError::Api {
                    service: SOURCE,
                    message: envelope
                        .message
                        .unwrap_or_else(|| "unknown error".to_string()),
                });
            }
            if status.is_success() {
                return Ok(envelope.articles);
            }
        }

        if !status.is_success() {
            return Err(SignalError::UnexpectedStatus {
                status: status.as_u16(),
                url: request_url,
            });
        }

        let envelope: Envelope = parse_json(&body, &format!("everything({tool})"))?;
        Ok(envelope.articles)
    }
}

fn article_topic(article: Article, tool: &str, registry: &Registry, now: DateTime<Utc>) -> Topic {
    let title = article.title.unwrap_or_default();
    let content = match article.description.as_deref() {
        Some(description) if !description.is_empty() => format!("{title} {description}"),
        _ => title.clone(),
    };
    let published = article
        .published_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let score = article_score(published, article.source.name.as_deref(), now);
    let mut topic = Topic::new(tool, SOURCE, score, text::related_terms(&title, registry));
    topic.sentiment = text::sentiment(&content, registry);
    topic.timestamp = article
        .published_at
        .unwrap_or_else(|| now.to_rfc3339());
    topic.url = article.url.filter(|u| !u.is_empty());
    topic.content_snippet = text::snippet(&title, text::SNIPPET_CHARS);
    topic
}

/// `(freshness + source weight) / 2`, capped at 100.
///
/// Freshness is `100 - hours since publication` (at least 0), or 50 when the
/// publication time is unknown. TechCrunch and Reuters weigh 80, others 50.
fn article_score(published: Option<DateTime<Utc>>, source_name: Option<&str>, now: DateTime<Utc>) -> u32 {
    let freshness = published.map_or(UNKNOWN_FRESHNESS, |at| {
        let hours = (now - at).num_hours().max(0);
        u32::try_from((100 - hours).max(0)).unwrap_or(0)
    });

    let source = source_name.unwrap_or_default().to_lowercase();
    let weight = if source.contains("techcrunch") || source.contains("reuters") {
        WIRE_SOURCE_WEIGHT
    } else {
        DEFAULT_SOURCE_WEIGHT
    };

    ((freshness + weight) / 2).min(100)
}
