//! Headline heuristics shared by the collectors: keyword picking, related
//! term extraction and a word-list sentiment guess.

use trendscout_core::Registry;

use crate::types::Sentiment;

const MAX_RELATED_TERMS: usize = 5;
pub(crate) const SNIPPET_CHARS: usize = 200;

/// Pick the keyword a headline is about.
///
/// The first registered tool mentioned wins; otherwise the first word longer
/// than three characters that is not a stopword; otherwise `"AI"`.
pub(crate) fn main_keyword(text: &str, registry: &Registry) -> String {
    if let Some(tool) = registry.find_tool(text) {
        return tool.to_string();
    }

    text.split_whitespace()
        .map(trim_word)
        .find(|word| word.chars().count() > 3 && !is_stopword(&word.to_lowercase(), registry))
        .map_or_else(|| "AI".to_string(), str::to_string)
}

/// Lower-cased significant words of a headline, at most five.
pub(crate) fn related_terms(text: &str, registry: &Registry) -> Vec<String> {
    text.split_whitespace()
        .map(|word| trim_word(word).to_lowercase())
        .filter(|word| {
            word.chars().count() > 4
                && !is_stopword(word, registry)
                && !word.chars().all(|c| c.is_ascii_digit())
        })
        .take(MAX_RELATED_TERMS)
        .collect()
}

/// Compare how many positive and negative marker words `text` contains.
pub(crate) fn sentiment(text: &str, registry: &Registry) -> Sentiment {
    let lower = text.to_lowercase();
    let count = |terms: &[String]| {
        terms
            .iter()
            .filter(|t| !t.is_empty() && lower.contains(&t.to_lowercase()))
            .count()
    };
    let positive = count(&registry.positive_terms);
    let negative = count(&registry.negative_terms);

    match negative.cmp(&positive) {
        std::cmp::Ordering::Greater => Sentiment::Negative,
        std::cmp::Ordering::Less => Sentiment::Positive,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// First `max_chars` characters of `text`, on a char boundary.
pub(crate) fn snippet(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn is_stopword(word: &str, registry: &Registry) -> bool {
    registry.stopwords.iter().any(|s| s.eq_ignore_ascii_case(word))
}
