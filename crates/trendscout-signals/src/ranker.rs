//! Merge duplicate topics and turn them into ranked [`KeywordRecord`]s.
//!
//! Duplicate policy: topics sharing a keyword (case-insensitive) collapse into
//! the highest-scoring one, earliest discovery winning ties. The merged record
//! keeps the first discovery position, takes the group's highest controversy
//! score, and lists every reporting source in `data_sources`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use trendscout_core::{Category, Registry};

use crate::types::{Difficulty, KeywordRecord, Sentiment, Topic};

/// Collapse duplicate keywords. Idempotent.
#[must_use]
pub fn dedupe_topics(topics: &[Topic]) -> Vec<Topic> {
    merge_topics(topics).into_iter().map(|(topic, _)| topic).collect()
}

/// Merge, enrich, and rank topics.
///
/// Records are sorted by `(controversy_score, score)` descending; the sort is
/// stable so discovery order breaks ties. `max_keywords == 0` keeps everything.
#[must_use]
pub fn rank_keywords(
    topics: &[Topic],
    registry: &Registry,
    max_keywords: usize,
    now: DateTime<Utc>,
) -> Vec<KeywordRecord> {
    let mut records: Vec<KeywordRecord> = merge_topics(topics)
        .into_iter()
        .map(|(topic, sources)| build_record(&topic, sources, registry, now))
        .collect();

    records.sort_by(|a, b| {
        (b.controversy_score, b.score).cmp(&(a.controversy_score, a.score))
    });

    if max_keywords > 0 {
        records.truncate(max_keywords);
    }
    records
}

fn merge_topics(topics: &[Topic]) -> Vec<(Topic, Vec<String>)> {
    let mut merged: Vec<(Topic, Vec<String>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for topic in topics {
        let key = topic.merge_key();
        let slot = match index.get(&key).copied() {
            Some(slot) => slot,
            None => {
                index.insert(key, merged.len());
                merged.push((topic.clone(), vec![topic.source.clone()]));
                continue;
            }
        };

        let (existing, sources) = &mut merged[slot];
        if !sources.contains(&topic.source) {
            sources.push(topic.source.clone());
        }

        let (controversy_score, controversy_terms) =
            if topic.controversy_score > existing.controversy_score {
                (topic.controversy_score, topic.controversy_terms.clone())
            } else {
                (
                    existing.controversy_score,
                    std::mem::take(&mut existing.controversy_terms),
                )
            };

        if topic.score > existing.score {
            *existing = topic.clone();
        }
        existing.controversy_score = controversy_score;
        existing.controversy_terms = controversy_terms;
    }

    merged
}

fn build_record(
    topic: &Topic,
    data_sources: Vec<String>,
    registry: &Registry,
    now: DateTime<Utc>,
) -> KeywordRecord {
    let category = registry.category_for(&topic.keyword);
    let intent = commercial_intent(topic, registry);
    let thresholds = &registry.thresholds;

    KeywordRecord {
        keyword: topic.keyword.clone(),
        category,
        score: topic.score,
        related_terms: topic.related_terms.clone(),
        source: topic.source.clone(),
        data_sources,
        sentiment: topic.sentiment,
        controversy_score: topic.controversy_score,
        controversy_terms: topic.controversy_terms.clone(),
        search_volume: search_volume(topic.score),
        commercial_intent: intent,
        difficulty: difficulty(topic.score, topic.controversy_score),
        monthly_revenue_estimate: monthly_revenue_estimate(topic.score, topic.controversy_score),
        reason: selection_reason(topic, category, intent, registry),
        is_trending_topic: topic.score > thresholds.trending_score
            || topic.controversy_score > thresholds.trending_controversy,
        url: topic.url.clone(),
        content_snippet: topic.content_snippet.clone(),
        last_updated: now,
    }
}

/// Estimated monthly searches: 70% of `score × 1000`, at least 100.
#[must_use]
pub fn search_volume(score: u32) -> u64 {
    let base = u64::from(score) * 1000;
    let variation = base * 3 / 10;
    (base - variation).max(100)
}

/// Commercial intent in `[0.0, 1.0]`, rounded to three decimals.
///
/// 0.5 base, +0.1 per commercial term found in the keyword or related terms
/// (capped at +0.4), +0.002 per controversy point (capped at +0.2).
#[must_use]
pub fn commercial_intent(topic: &Topic, registry: &Registry) -> f64 {
    let text = format!("{} {}", topic.keyword, topic.related_terms.join(" ")).to_lowercase();
    let hits = registry
        .commercial_terms
        .iter()
        .filter(|t| !t.is_empty() && text.contains(&t.to_lowercase()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let commercial_bonus = (hits as f64 * 0.1).min(0.4);
    let controversy_bonus = (f64::from(topic.controversy_score) * 0.002).min(0.2);
    let total = (0.5 + commercial_bonus + controversy_bonus).min(1.0);
    (total * 1000.0).round() / 1000.0
}

#[must_use]
pub fn difficulty(score: u32, controversy_score: u32) -> Difficulty {
    let combined = f64::from(score) + f64::from(controversy_score) * 0.5;
    if combined >= 90.0 {
        Difficulty::High
    } else if combined >= 60.0 {
        Difficulty::Medium
    } else {
        Difficulty::Low
    }
}

/// Revenue band `"$min-max"` from `5 × score + 3 × controversy`.
///
/// The floor is 80% of the total (at least $50); the ceiling 150%, never
/// below the floor.
#[must_use]
pub fn monthly_revenue_estimate(score: u32, controversy_score: u32) -> String {
    let total = u64::from(score) * 5 + u64::from(controversy_score) * 3;
    let low = (total * 8 / 10).max(50);
    let high = (total * 15 / 10).max(low);
    format!("${low}-{high}")
}

fn selection_reason(topic: &Topic, category: Category, intent: f64, registry: &Registry) -> String {
    let label = category.label();
    let mut parts = vec![if topic.score >= 80 {
        format!("This keyword shows high competition with growing search trends in the {label} category")
    } else if topic.score >= 50 {
        format!("This keyword shows medium competition with strong search trends in the {label} category")
    } else {
        format!("This keyword shows low competition with growing search trends in the {label} category")
    }];

    if let Some(note) = source_note(&topic.source) {
        parts.push(note.to_string());
    }

    if topic.controversy_score > registry.thresholds.controversy_alert {
        parts.push(format!(
            "**TRENDING CONTROVERSY DETECTED** - Recent surge in problem-related queries (score: {})",
            topic.controversy_score
        ));
        parts.push(
            "making this highly valuable for capturing user attention and providing timely solutions"
                .to_string(),
        );
    }

    if topic.sentiment == Sentiment::Negative {
        parts.push("with excellent opportunity for solution-oriented content".to_string());
    }

    let potential = if intent > 0.8 {
        "excellent"
    } else if intent > 0.6 {
        "strong"
    } else {
        "moderate"
    };

    format!(
        "{}, making it ideal for our AI tools directory targeting with {potential} commercial potential.",
        parts.join(", ")
    )
}

fn source_note(source: &str) -> Option<&'static str> {
    if source.starts_with("reddit") {
        Some("with strong community engagement on Reddit")
    } else if source == "hackernews" {
        Some("with developer community interest")
    } else if source.starts_with("rss_") {
        Some("with coverage across AI news feeds")
    } else if source.contains("news") {
        Some("with recent news coverage")
    } else if source == "google_trends" {
        Some("with rising search interest")
    } else {
        None
    }
}

#[cfg(test)]
#[path = "ranker_test.rs"]
mod tests;
