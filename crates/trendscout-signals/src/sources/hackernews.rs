//! Hacker News collector: top stories whose title mentions a tool.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use trendscout_core::Registry;

use super::fetch::send_json;
use super::{Attempts, SignalCollector};
use crate::error::SignalError;
use crate::text;
use crate::types::Topic;

const SOURCE: &str = "hackernews";
const STORIES_INSPECTED: usize = 20;

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: u32,
    url: Option<String>,
    time: Option<i64>,
}

impl SignalCollector {
    pub(super) async fn collect_hackernews(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let ids: Vec<u64> = send_json(
            self.client
                .get(format!("{}/v0/topstories.json", self.endpoints.hackernews)),
            "topstories",
        )
        .await?;

        let mut attempts = Attempts::new(SOURCE);
        let mut topics = Vec::new();
        for id in ids.into_iter().take(STORIES_INSPECTED) {
            self.pause().await;
            // A missing or deleted item is `null`.
            let result: Result<Option<Item>, SignalError> = send_json(
                self.client
                    .get(format!("{}/v0/item/{id}.json", self.endpoints.hackernews)),
                "item",
            )
            .await;

            if let Some(topic) = attempts
                .record(&id.to_string(), result)
                .flatten()
                .and_then(|item| story_topic(item, registry, now))
            {
                topics.push(topic);
            }
        }

        attempts.finish(topics)
    }
}

fn story_topic(item: Item, registry: &Registry, now: DateTime<Utc>) -> Option<Topic> {
    let title = item.title.trim();
    if !registry.mentions_tool(title) {
        return None;
    }

    let mut topic = Topic::new(
        &text::main_keyword(title, registry),
        SOURCE,
        item.score.min(100),
        text::related_terms(title, registry),
    );
    topic.sentiment = text::sentiment(title, registry);
    topic.timestamp = item
        .time
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or(now)
        .to_rfc3339();
    topic.url = item.url.filter(|u| !u.is_empty());
    topic.content_snippet = text::snippet(title, text::SNIPPET_CHARS);
    Some(topic)
}
