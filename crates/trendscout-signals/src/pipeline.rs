//! Keyword discovery orchestration.

use chrono::{DateTime, Utc};
use trendscout_core::Registry;

use crate::handoff::{build_summary, NotificationSummary};
use crate::ranker::{dedupe_topics, rank_keywords};
use crate::scorer::score_controversy;
use crate::sources::{SignalCollector, SourceReport};
use crate::types::{KeywordRecord, Topic};

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct DiscoveryRun {
    pub generated_at: DateTime<Utc>,
    /// Scored topics after de-duplication, in discovery order.
    pub topics: Vec<Topic>,
    pub keywords: Vec<KeywordRecord>,
    pub reports: Vec<SourceReport>,
    pub summary: NotificationSummary,
}

/// The network-free half of a run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub topics: Vec<Topic>,
    pub keywords: Vec<KeywordRecord>,
    pub summary: NotificationSummary,
}

/// Run the full pipeline for one invocation.
///
/// 1. Collect topics from every source (sequentially).
/// 2. Score controversy against the registry lexicon.
/// 3. Merge duplicates, enrich and rank into keyword records.
/// 4. Build the notification summary.
///
/// Never fails: source failures are logged and reported, and zero topics
/// yield an empty keyword list with a zero summary.
pub async fn run_keyword_discovery(
    collector: &SignalCollector,
    registry: &Registry,
    max_keywords: usize,
    now: DateTime<Utc>,
) -> DiscoveryRun {
    let collection = collector.collect(registry, now).await;

    if collection.topics.is_empty() {
        tracing::warn!("no topics collected from any source");
    }

    let analysis = analyze_topics(collection.topics, registry, max_keywords, now);

    tracing::info!(
        topics = analysis.topics.len(),
        keywords = analysis.keywords.len(),
        "keyword discovery finished"
    );

    DiscoveryRun {
        generated_at: now,
        topics: analysis.topics,
        keywords: analysis.keywords,
        reports: collection.reports,
        summary: analysis.summary,
    }
}

/// Score, merge and rank already-collected topics.
#[must_use]
pub fn analyze_topics(
    mut topics: Vec<Topic>,
    registry: &Registry,
    max_keywords: usize,
    now: DateTime<Utc>,
) -> Analysis {
    score_controversy(&mut topics, &registry.controversy);

    let keywords = rank_keywords(&topics, registry, max_keywords, now);
    let topics = dedupe_topics(&topics);
    let summary = build_summary(&topics, &keywords, &registry.thresholds, now);

    Analysis {
        topics,
        keywords,
        summary,
    }
}
