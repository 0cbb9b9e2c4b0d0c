//! Run-level controversy assessment.
//!
//! Where [`crate::scorer`] scores topics one at a time, this looks at every
//! controversial topic of a run together: how heated the run is overall,
//! which kind of complaint dominates, and whether the discussion is growing.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Topic;

/// A topic counts as recent when published within this many hours.
const RECENT_HOURS: i64 = 6;
/// Unique sources needed for full confidence.
const CONFIDENT_SOURCES: f64 = 2.0;
const MAX_SOURCE_WEIGHT: f64 = 2.0;
const SOURCE_WEIGHT_STEP: f64 = 0.5;

/// Markers per controversy kind, matched against a topic's keyword and its
/// matched controversy terms.
const KIND_MARKERS: &[(ControversyKind, &[&str])] = &[
    (
        ControversyKind::Performance,
        &["slow", "lag", "downgrade", "performance", "降智", "响应变慢", "性能下降"],
    ),
    (
        ControversyKind::Reliability,
        &["outage", "downtime", "crash", "broken", "error", "服务中断", "故障"],
    ),
    (
        ControversyKind::Privacy,
        &["privacy", "breach", "leak", "隐私", "数据泄露"],
    ),
    (
        ControversyKind::Ethical,
        &["bias", "unfair", "censored", "banned", "lawsuit", "算法偏见", "歧视"],
    ),
    (
        ControversyKind::Commercial,
        &["scam", "overpriced", "ripoff", "pricing", "割韭菜", "智商税"],
    ),
    (
        ControversyKind::Quality,
        &["quality", "accuracy", "worse", "decline", "质量下降", "准确率下降"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControversyKind {
    /// No controversial topic in the run.
    None,
    /// Controversial topics that fit no specific kind.
    General,
    Performance,
    Reliability,
    Privacy,
    Ethical,
    Commercial,
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Minimal,
    Minor,
    Moderate,
    Major,
    Critical,
}

impl RiskLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Minimal => "minimal",
            RiskLevel::Minor => "minor",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Major => "major",
            RiskLevel::Critical => "critical",
        }
    }

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskLevel::Critical
        } else if score >= 50.0 {
            RiskLevel::Major
        } else if score >= 30.0 {
            RiskLevel::Moderate
        } else if score >= 15.0 {
            RiskLevel::Minor
        } else {
            RiskLevel::Minimal
        }
    }

    /// What the content scripts should do about a run at this level.
    #[must_use]
    pub fn recommended_action(self) -> &'static str {
        match self {
            RiskLevel::Critical => {
                "publish a hot-topic analysis now, with fixes and alternatives"
            }
            RiskLevel::Major => {
                "prioritize an in-depth piece that weighs the complaints against an objective review"
            }
            RiskLevel::Moderate => "cover it in regular content without amplifying the controversy",
            RiskLevel::Minor => "keep monitoring before writing about it",
            RiskLevel::Minimal => "skip controversy content and focus on other topics",
            RiskLevel::None => "generate regular content",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Unknown,
    Rising,
    Stable,
    Falling,
}

impl TrendDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Unknown => "unknown",
            TrendDirection::Rising => "rising",
            TrendDirection::Stable => "stable",
            TrendDirection::Falling => "falling",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControversyAnalysis {
    /// Keyword carrying the most controversy, `None` for a calm run.
    pub topic: Option<String>,
    pub overall_score: f64,
    /// `0.0..=1.0`, grows with the number of distinct sources.
    pub confidence: f64,
    pub category: ControversyKind,
    pub risk_level: RiskLevel,
    pub recommended_action: String,
    pub trend: TrendDirection,
    /// Topics with a non-zero controversy score.
    pub signal_count: usize,
}

impl ControversyAnalysis {
    fn calm() -> Self {
        Self {
            topic: None,
            overall_score: 0.0,
            confidence: 0.0,
            category: ControversyKind::None,
            risk_level: RiskLevel::None,
            recommended_action: RiskLevel::None.recommended_action().to_string(),
            trend: TrendDirection::Unknown,
            signal_count: 0,
        }
    }
}

/// Assess the controversial topics of a run.
///
/// Each topic with a non-zero controversy score is a signal of intensity
/// `min(100, controversy_score)`. A signal is weighted by how many signals
/// its source produced (`min(2.0, 0.5 * count)`), and the overall score is
/// the mean weighted intensity.
#[must_use]
pub fn analyze_controversy(topics: &[Topic], now: DateTime<Utc>) -> ControversyAnalysis {
    let signals: Vec<&Topic> = topics.iter().filter(|t| t.controversy_score > 0).collect();
    if signals.is_empty() {
        return ControversyAnalysis::calm();
    }

    let mut per_source: HashMap<&str, usize> = HashMap::new();
    for signal in &signals {
        *per_source.entry(signal.source.as_str()).or_default() += 1;
    }

    let weighted_total: f64 = signals
        .iter()
        .map(|s| {
            let count = per_source.get(s.source.as_str()).copied().unwrap_or(1);
            let weight = (to_f64(count) * SOURCE_WEIGHT_STEP).min(MAX_SOURCE_WEIGHT);
            intensity(s) * weight
        })
        .sum();
    let overall_score = weighted_total / to_f64(signals.len());
    let confidence = (to_f64(per_source.len()) / CONFIDENT_SOURCES).min(1.0);
    let risk_level = RiskLevel::from_score(overall_score);

    ControversyAnalysis {
        topic: representative_topic(&signals),
        overall_score,
        confidence,
        category: dominant_kind(&signals),
        risk_level,
        recommended_action: risk_level.recommended_action().to_string(),
        trend: trend_direction(&signals, now),
        signal_count: signals.len(),
    }
}

fn intensity(topic: &Topic) -> f64 {
    f64::from(topic.controversy_score.min(100))
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

/// Keyword with the highest summed intensity; the first seen wins ties.
fn representative_topic(signals: &[&Topic]) -> Option<String> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for signal in signals {
        let key = signal.merge_key();
        match totals.iter_mut().find(|(k, _)| *k == key) {
            Some((_, total)) => *total += intensity(signal),
            None => totals.push((key, intensity(signal))),
        }
    }

    let best = totals
        .iter()
        .fold(None::<&(String, f64)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        })?;

    signals
        .iter()
        .find(|s| s.merge_key() == best.0)
        .map(|s| s.keyword.clone())
}

/// Kind whose markers carry the most intensity; declaration order breaks ties.
fn dominant_kind(signals: &[&Topic]) -> ControversyKind {
    let mut best = (ControversyKind::General, 0.0_f64);
    for (kind, markers) in KIND_MARKERS {
        let total: f64 = signals
            .iter()
            .filter(|s| mentions_any(s, markers))
            .map(|s| intensity(s))
            .sum();
        if total > best.1 {
            best = (*kind, total);
        }
    }
    best.0
}

fn mentions_any(topic: &Topic, markers: &[&str]) -> bool {
    let keyword = topic.keyword.to_lowercase();
    markers.iter().any(|m| {
        keyword.contains(m)
            || topic
                .controversy_terms
                .iter()
                .any(|t| t.to_lowercase().contains(m))
    })
}

/// Compare recent signals with older ones. Unparsable timestamps count as
/// older.
fn trend_direction(signals: &[&Topic], now: DateTime<Utc>) -> TrendDirection {
    let recent = signals
        .iter()
        .filter(|s| {
            DateTime::parse_from_rfc3339(&s.timestamp).is_ok_and(|ts| {
                (now - ts.with_timezone(&Utc)).num_minutes() <= RECENT_HOURS * 60
            })
        })
        .count();
    let older = signals.len() - recent;

    if recent > older * 2 {
        TrendDirection::Rising
    } else if recent * 2 < older {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
#[path = "controversy_test.rs"]
mod tests;
