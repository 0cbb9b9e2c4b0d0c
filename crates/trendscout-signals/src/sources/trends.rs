//! Google Trends collector.
//!
//! For each seed: the explore call hands out widget tokens, the `TIMESERIES`
//! widget gives interest over the last three months and `RELATED_QUERIES`
//! gives the top related searches. Every response starts with an anti-JSON
//! guard that has to be stripped before parsing.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use trendscout_core::Registry;

use super::fetch::{parse_json, send_text};
use super::{Attempts, SignalCollector};
use crate::error::SignalError;
use crate::text;
use crate::types::Topic;

const SOURCE: &str = "google_trends";
const TIMEFRAME: &str = "today 3-m";
const HOST_LANGUAGE: &str = "en-US";
const TZ_OFFSET_MINUTES: &str = "360";
const MAX_RELATED_QUERIES: usize = 10;
const GUARD_PREFIX: &str = ")]}'";

#[derive(Debug, Deserialize)]
struct Explore {
    #[serde(default)]
    widgets: Vec<Widget>,
}

#[derive(Debug, Deserialize)]
struct Widget {
    id: String,
    #[serde(default)]
    token: String,
    #[serde(default)]
    request: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct Multiline {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Timeline {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RelatedSearches {
    default: RankedLists,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedLists {
    #[serde(default)]
    ranked_list: Vec<RankedList>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedList {
    #[serde(default)]
    ranked_keyword: Vec<RankedKeyword>,
}

#[derive(Debug, Deserialize)]
struct RankedKeyword {
    query: String,
}

impl SignalCollector {
    pub(super) async fn collect_trends(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let mut attempts = Attempts::new(SOURCE);
        let mut topics = Vec::new();

        for (i, seed) in registry
            .trend_seeds(self.seeds_per_category)
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                self.pause().await;
            }
            let result = self.trend_topic(seed, registry, now).await;
            if let Some(topic) = attempts.record(seed, result) {
                topics.push(topic);
            }
        }

        attempts.finish(topics)
    }

    async fn trend_topic(
        &self,
        seed: &str,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Topic, SignalError> {
        let widgets = self.explore(seed).await?;

        let timeseries = widgets
            .iter()
            .find(|w| w.id == "TIMESERIES")
            .ok_or_else(|| SignalError::Api {
                service: SOURCE,
                message: format!("explore returned no TIMESERIES widget for '{seed}'"),
            })?;
        let score = self.interest_score(timeseries).await?;

        // Related queries are optional enrichment.
        let related = match widgets.iter().find(|w| w.id == "RELATED_QUERIES") {
            Some(widget) => match self.related_queries(widget).await {
                Ok(queries) => queries,
                Err(e) => {
                    tracing::warn!(source = SOURCE, seed, error = %e, "related queries failed");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let mut topic = Topic::new(seed, SOURCE, score, related);
        topic.sentiment = text::sentiment(&topic.related_terms.join(" "), registry);
        topic.timestamp = now.to_rfc3339();
        Ok(topic)
    }

    async fn explore(&self, seed: &str) -> Result<Vec<Widget>, SignalError> {
        let req = json!({
            "comparisonItem": [{ "keyword": seed, "geo": "", "time": TIMEFRAME }],
            "category": 0,
            "property": "",
        });
        let url = format!("{}/trends/api/explore", self.endpoints.google_trends);
        let request = self.client.get(url).query(&[
            ("hl", HOST_LANGUAGE),
            ("tz", TZ_OFFSET_MINUTES),
            ("req", req.to_string().as_str()),
        ]);

        let body = send_text(request).await?;
        let explore: Explore = parse_json(strip_guard(&body), &format!("explore({seed})"))?;
        Ok(explore.widgets)
    }

    async fn interest_score(&self, widget: &Widget) -> Result<u32, SignalError> {
        let body = self.widget_data("multiline", widget).await?;
        let multiline: Multiline = parse_json(strip_guard(&body), "widgetdata/multiline")?;
        Ok(mean_interest(&multiline.default.timeline_data))
    }

    async fn related_queries(&self, widget: &Widget) -> Result<Vec<String>, SignalError> {
        let body = self.widget_data("relatedsearches", widget).await?;
        let related: RelatedSearches =
            parse_json(strip_guard(&body), "widgetdata/relatedsearches")?;

        // The first list is "top", the second "rising".
        Ok(related
            .default
            .ranked_list
            .into_iter()
            .next()
            .map(|top| {
                top.ranked_keyword
                    .into_iter()
                    .map(|k| k.query)
                    .take(MAX_RELATED_QUERIES)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn widget_data(&self, kind: &str, widget: &Widget) -> Result<String, SignalError> {
        self.pause().await;
        let url = format!(
            "{}/trends/api/widgetdata/{kind}",
            self.endpoints.google_trends
        );
        let request = self.client.get(url).query(&[
            ("hl", HOST_LANGUAGE),
            ("tz", TZ_OFFSET_MINUTES),
            ("req", widget.request.to_string().as_str()),
            ("token", widget.token.as_str()),
        ]);
        send_text(request).await
    }
}

fn strip_guard(body: &str) -> &str {
    let trimmed = body.trim_start();
    trimmed
        .strip_prefix(GUARD_PREFIX)
        .map_or(trimmed, |rest| rest.trim_start_matches(',').trim_start())
}

/// Mean of the first series, rounded down and capped at 100. No data is 0.
fn mean_interest(points: &[TimelinePoint]) -> u32 {
    let values: Vec<u64> = points
        .iter()
        .filter_map(|p| p.value.first().copied())
        .map(u64::from)
        .collect();
    if values.is_empty() {
        return 0;
    }
    let count = u64::try_from(values.len()).unwrap_or(u64::MAX);
    let mean = values.iter().sum::<u64>() / count;
    u32::try_from(mean.min(100)).unwrap_or(100)
}
