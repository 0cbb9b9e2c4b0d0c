//! Output artifacts read by the downstream content and notification scripts.
//!
//! Three files: the ranked keyword list, the notification summary and an
//! optional raw topic cache. Every write overwrites the previous run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trendscout_core::{AppConfig, Thresholds};

use crate::controversy::{analyze_controversy, ControversyAnalysis};
use crate::error::SignalError;
use crate::pipeline::DiscoveryRun;
use crate::types::{Difficulty, KeywordRecord, Sentiment, Topic};

const TOP_CONTROVERSIES: usize = 3;
const HIGHLIGHT_SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub keywords: PathBuf,
    pub notification: PathBuf,
    pub topics_cache: Option<PathBuf>,
}

impl ArtifactPaths {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            keywords: config.keywords_path.clone(),
            notification: config.notification_path.clone(),
            topics_cache: config.topics_cache_path.clone(),
        }
    }
}

/// The keyword the notification leads with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyword {
    pub keyword: String,
    pub trend_score: u32,
    pub controversy_score: u32,
    pub monthly_revenue_estimate: String,
    pub difficulty: Difficulty,
    pub commercial_intent: f64,
    pub reason: String,
    pub data_sources: Vec<String>,
    pub related_queries: Vec<String>,
    pub sentiment: Sentiment,
    pub is_trending_topic: bool,
}

impl From<&KeywordRecord> for PrimaryKeyword {
    fn from(record: &KeywordRecord) -> Self {
        Self {
            keyword: record.keyword.clone(),
            trend_score: record.score,
            controversy_score: record.controversy_score,
            monthly_revenue_estimate: record.monthly_revenue_estimate.clone(),
            difficulty: record.difficulty,
            commercial_intent: record.commercial_intent,
            reason: record.reason.clone(),
            data_sources: record.data_sources.clone(),
            related_queries: record.related_terms.clone(),
            sentiment: record.sentiment,
            is_trending_topic: record.is_trending_topic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentData {
    pub total_topics: usize,
    pub total_keywords: usize,
    pub controversy_detected: bool,
    /// Distinct source tags, sorted.
    pub sources_used: Vec<String>,
    pub avg_controversy_score: f64,
    pub high_value_keywords: usize,
    pub generation_timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControversyHighlight {
    pub keyword: String,
    pub controversy_score: u32,
    pub source: String,
    pub content_snippet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingAnalysis {
    pub top_controversies: Vec<ControversyHighlight>,
    /// More than one distinct source contributed.
    pub multi_source_validation: bool,
    /// At least one topic came from a live source.
    pub real_time_data: bool,
}

/// Contents of the notification file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSummary {
    /// Highest-ranked record; `null` when nothing was found.
    pub keyword_data: Option<PrimaryKeyword>,
    pub content_data: ContentData,
    pub trending_analysis: TrendingAnalysis,
    pub controversy_analysis: ControversyAnalysis,
}

/// Raw scored topics, for debugging and re-ranking without re-collecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCache {
    pub generated_at: DateTime<Utc>,
    pub total_topics: usize,
    pub sources_used: Vec<String>,
    pub topics: Vec<Topic>,
}

impl TopicCache {
    #[must_use]
    pub fn new(topics: &[Topic], generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            total_topics: topics.len(),
            sources_used: sources_used(topics),
            topics: topics.to_vec(),
        }
    }
}

/// Summarize a run. With no topics every count is zero and the average
/// controversy is 0.0.
#[must_use]
pub fn build_summary(
    topics: &[Topic],
    records: &[KeywordRecord],
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> NotificationSummary {
    let sources = sources_used(topics);

    let avg_controversy_score = if topics.is_empty() {
        0.0
    } else {
        let total: u64 = topics.iter().map(|t| u64::from(t.controversy_score)).sum();
        #[allow(clippy::cast_precision_loss)]
        let avg = total as f64 / topics.len() as f64;
        avg
    };

    let mut by_controversy: Vec<&Topic> = topics.iter().collect();
    by_controversy.sort_by(|a, b| b.controversy_score.cmp(&a.controversy_score));
    let top_controversies = by_controversy
        .into_iter()
        .take(TOP_CONTROVERSIES)
        .filter(|t| t.controversy_score > thresholds.top_controversy_floor)
        .map(|t| ControversyHighlight {
            keyword: t.keyword.clone(),
            controversy_score: t.controversy_score,
            source: t.source.clone(),
            content_snippet: t.content_snippet.chars().take(HIGHLIGHT_SNIPPET_CHARS).collect(),
        })
        .collect();

    NotificationSummary {
        keyword_data: records.first().map(PrimaryKeyword::from),
        content_data: ContentData {
            total_topics: topics.len(),
            total_keywords: records.len(),
            controversy_detected: topics
                .iter()
                .any(|t| t.controversy_score > thresholds.trending_controversy),
            sources_used: sources.clone(),
            avg_controversy_score,
            high_value_keywords: records
                .iter()
                .filter(|r| r.score > thresholds.high_value_score)
                .count(),
            generation_timestamp: now,
        },
        trending_analysis: TrendingAnalysis {
            top_controversies,
            multi_source_validation: sources.len() > 1,
            real_time_data: !topics.is_empty(),
        },
        controversy_analysis: analyze_controversy(topics, now),
    }
}

/// Write the keyword list, the summary and (when configured) the topic cache.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns [`SignalError::Serialize`] or [`SignalError::Write`]; a failed
/// write is fatal for the run.
pub fn write_artifacts(paths: &ArtifactPaths, run: &DiscoveryRun) -> Result<(), SignalError> {
    write_json(&paths.keywords, &run.keywords, "keyword list")?;
    write_json(&paths.notification, &run.summary, "notification summary")?;

    if let Some(cache_path) = &paths.topics_cache {
        let cache = TopicCache::new(&run.topics, run.generated_at);
        write_json(cache_path, &cache, "topic cache")?;
    }

    tracing::info!(
        keywords = run.keywords.len(),
        path = %paths.keywords.display(),
        "wrote keyword artifacts"
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    context: &'static str,
) -> Result<(), SignalError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| SignalError::Serialize { context, source: e })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SignalError::Write {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    std::fs::write(path, json).map_err(|e| SignalError::Write {
        path: path.display().to_string(),
        source: e,
    })
}

fn sources_used(topics: &[Topic]) -> Vec<String> {
    topics
        .iter()
        .map(|t| t.source.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "handoff_test.rs"]
mod tests;
