use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trendscout_core::Category;

/// Heuristic tone of a topic's headline or related queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A trending term gathered from one signal source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub keyword: String,
    /// Popularity normalized to `0..=100` by the producing collector.
    pub score: u32,
    pub related_terms: Vec<String>,
    /// Collector tag, e.g. `hackernews` or `reddit_OpenAI`.
    pub source: String,
    pub sentiment: Sentiment,
    /// Sum of lexicon weights matched in `related_terms`. Set by the scorer.
    pub controversy_score: u32,
    /// Related terms that matched the controversy lexicon.
    #[serde(default)]
    pub controversy_terms: Vec<String>,
    /// Source-provided publication time, or collection time when unknown.
    pub timestamp: String,
    pub url: Option<String>,
    #[serde(default)]
    pub content_snippet: String,
}

impl Topic {
    /// A topic with neutral sentiment, no controversy, and no provenance.
    #[must_use]
    pub fn new(keyword: &str, source: &str, score: u32, related_terms: Vec<String>) -> Self {
        Self {
            keyword: keyword.to_string(),
            score: score.min(100),
            related_terms,
            source: source.to_string(),
            sentiment: Sentiment::Neutral,
            controversy_score: 0,
            controversy_terms: Vec::new(),
            timestamp: String::new(),
            url: None,
            content_snippet: String::new(),
        }
    }

    /// Case-insensitive identity used for de-duplication.
    #[must_use]
    pub fn merge_key(&self) -> String {
        self.keyword.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

/// Ranked, enriched keyword handed to the downstream content scripts.
///
/// Wire names `trend_score` and `related_queries` are what those scripts read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub category: Category,
    #[serde(rename = "trend_score")]
    pub score: u32,
    #[serde(rename = "related_queries")]
    pub related_terms: Vec<String>,
    pub source: String,
    pub data_sources: Vec<String>,
    pub sentiment: Sentiment,
    pub controversy_score: u32,
    pub controversy_terms: Vec<String>,
    pub search_volume: u64,
    pub commercial_intent: f64,
    pub difficulty: Difficulty,
    pub monthly_revenue_estimate: String,
    pub reason: String,
    pub is_trending_topic: bool,
    pub url: Option<String>,
    pub content_snippet: String,
    pub last_updated: DateTime<Utc>,
}
