//! Reddit collector (client-credentials OAuth).
//!
//! Reads the hot listing of each configured subreddit and keeps posts whose
//! title mentions a known tool.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use trendscout_core::Registry;

use super::fetch::send_json;
use super::{Attempts, RedditCredentials, SignalCollector};
use crate::error::SignalError;
use crate::text;
use crate::types::Topic;

const HOT_LIMIT: &str = "10";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    #[serde(default)]
    title: String,
    #[serde(default)]
    score: i64,
    permalink: Option<String>,
    created_utc: Option<f64>,
}

impl SignalCollector {
    pub(super) async fn collect_reddit(
        &self,
        registry: &Registry,
        now: DateTime<Utc>,
    ) -> Result<Vec<Topic>, SignalError> {
        let credentials = self
            .reddit
            .as_ref()
            .ok_or(SignalError::MissingCredentials("Reddit"))?;
        let token = self.reddit_token(credentials).await?;

        let mut attempts = Attempts::new("reddit");
        let mut topics = Vec::new();

        for subreddit in &registry.subreddits {
            self.pause().await;
            let result = self.hot_posts(subreddit, &token, credentials).await;
            if let Some(posts) = attempts.record(subreddit, result) {
                topics.extend(
                    posts
                        .into_iter()
                        .filter_map(|post| post_topic(post.data, subreddit, registry, now)),
                );
            }
        }

        attempts.finish(topics)
    }

    async fn reddit_token(&self, credentials: &RedditCredentials) -> Result<String, SignalError> {
        let response = self
            .client
            .post(format!("{}/api/v1/access_token", self.endpoints.reddit_auth))
            .header("User-Agent", &credentials.user_agent)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SignalError::Api {
                service: "reddit",
                message: format!("token exchange failed with status {}", response.status()),
            });
        }

        let body = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| SignalError::Deserialize {
                context: "reddit token".to_string(),
                source: e,
            })?;
        Ok(token.access_token)
    }

    async fn hot_posts(
        &self,
        subreddit: &str,
        token: &str,
        credentials: &RedditCredentials,
    ) -> Result<Vec<Post>, SignalError> {
        let request = self
            .client
            .get(format!("{}/r/{subreddit}/hot", self.endpoints.reddit_api))
            .header("Authorization", format!("Bearer {token}"))
            .header("User-Agent", &credentials.user_agent)
            .query(&[("limit", HOT_LIMIT)]);

        let listing: Listing = send_json(request, &format!("r/{subreddit}/hot")).await?;
        Ok(listing.data.children)
    }
}

fn post_topic(
    post: PostData,
    subreddit: &str,
    registry: &Registry,
    now: DateTime<Utc>,
) -> Option<Topic> {
    let title = post.title.trim();
    if title.is_empty() || !registry.mentions_tool(title) {
        return None;
    }

    let upvotes = u32::try_from(post.score.max(0)).unwrap_or(u32::MAX);
    let mut topic = Topic::new(
        &text::main_keyword(title, registry),
        &format!("reddit_{subreddit}"),
        (upvotes / 10).min(100),
        text::related_terms(title, registry),
    );
    topic.sentiment = text::sentiment(title, registry);
    topic.timestamp = post
        .created_utc
        .and_then(epoch_to_utc)
        .unwrap_or(now)
        .to_rfc3339();
    topic.url = post
        .permalink
        .map(|permalink| format!("https://reddit.com{permalink}"));
    topic.content_snippet = text::snippet(title, text::SNIPPET_CHARS);
    Some(topic)
}

#[allow(clippy::cast_possible_truncation)]
fn epoch_to_utc(secs: f64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs as i64, 0)
}
