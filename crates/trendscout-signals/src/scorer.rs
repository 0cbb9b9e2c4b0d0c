//! Controversy scorer: counts problem markers in a topic's related terms.

use trendscout_core::ControversyLexicon;

use crate::types::Topic;

/// Score a list of related terms against the lexicon.
///
/// Every `(term, marker)` pair where the lower-cased term contains the marker
/// adds `lexicon.weight`. Returns the total and the matching terms, each term
/// listed once in input order.
#[must_use]
pub fn controversy_score(related_terms: &[String], lexicon: &ControversyLexicon) -> (u32, Vec<String>) {
    let markers: Vec<String> = lexicon
        .terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut score = 0_u32;
    let mut matched = Vec::new();

    for term in related_terms {
        let lower = term.to_lowercase();
        let hits = markers.iter().filter(|m| lower.contains(m.as_str())).count();
        if hits == 0 {
            continue;
        }
        let hits = u32::try_from(hits).unwrap_or(u32::MAX);
        score = score.saturating_add(hits.saturating_mul(lexicon.weight));
        matched.push(term.clone());
    }

    (score, matched)
}

/// Set `controversy_score` and `controversy_terms` on one topic.
///
/// Overwrites any previous score, so rescoring is idempotent.
pub fn score_topic(topic: &mut Topic, lexicon: &ControversyLexicon) {
    let (score, matched) = controversy_score(&topic.related_terms, lexicon);
    topic.controversy_score = score;
    topic.controversy_terms = matched;
}

/// Score every topic in place.
pub fn score_controversy(topics: &mut [Topic], lexicon: &ControversyLexicon) {
    for topic in topics.iter_mut() {
        score_topic(topic, lexicon);
    }
}
