//! RSS collector: AI news feeds from the registry.

use chrono::{DateTime, Utc};
use reqwest::Url;
use trendscout_core::Registry;

use super::fetch::send_text;
use super::rss_helpers::{parse_feed, FeedItem};
use super::{Attempts, SignalCollector};
use crate::error::SignalError;
use crate::text;
use crate::types::Topic;

const ITEMS_PER_FEED: usize = 10;
const UNDATED_SCORE: u32 = 50;
const MIN_DATED_SCORE: i64 = 30;

impl SignalCollector {
    pub(super) async fn collect_rss(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let mut attempts = Attempts::new("rss");
        let mut topics = Vec::new();

        for (i, feed_url) in registry.rss_feeds.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }
            let result = self.fetch_feed(feed_url).await;
            if let Some(items) = attempts.record(feed_url, result) {
                let source = feed_source(feed_url);
                topics.extend(
                    items
                        .into_iter()
                        .filter_map(|item| item_topic(item, &source, registry, now)),
                );
            }
        }

        attempts.finish(topics)
    }

    async fn fetch_feed(&self, feed_url: &str) -> Result<Vec<FeedItem>, SignalError> {
        let body = send_text(self.client.get(feed_url)).await?;
        parse_feed(&body, ITEMS_PER_FEED)
    }
}

/// `rss_<host>` for a feed URL.
fn feed_source(feed_url: &str) -> String {
    let host = Url::parse(feed_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string());
    format!("rss_{host}")
}

fn item_topic(item: FeedItem, source: &str, registry: &Registry, now: DateTime<Utc>) -> Option<Topic> {
    let content = format!("{} {}", item.title, item.description);
    if !registry.mentions_tool(&content) {
        return None;
    }

    let published = item.pub_date.as_deref().and_then(parse_pub_date);
    let mut topic = Topic::new(
        &text::main_keyword(&item.title, registry),
        source,
        item_score(published, now),
        text::related_terms(&item.title, registry),
    );
    topic.sentiment = text::sentiment(&content, registry);
    topic.timestamp = item.pub_date.unwrap_or_else(|| now.to_rfc3339());
    topic.url = Some(item.link).filter(|link| !link.is_empty());
    topic.content_snippet = text::snippet(&item.description, text::SNIPPET_CHARS);
    Some(topic)
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `100 - hours/2` with a floor of 30; 50 when the date is unknown.
fn item_score(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    published.map_or(UNDATED_SCORE, |at| {
        let hours = (now - at).num_hours().max(0);
        u32::try_from((100 - hours / 2).max(MIN_DATED_SCORE)).unwrap_or(UNDATED_SCORE)
    })
}
