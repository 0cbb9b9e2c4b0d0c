//! Long-tail content keywords around a primary tool keyword.

use trendscout_core::Category;

const PATTERNS: [&str; 12] = [
    "{tool} review",
    "{tool} vs",
    "best {category} tools",
    "{tool} pricing",
    "how to use {tool}",
    "{tool} alternatives",
    "{tool} tutorial",
    "{tool} features",
    "is {tool} worth it",
    "{category} AI tools 2025",
    "free {category} AI",
    "{tool} comparison",
];

const AI_MODIFIERS: [&str; 7] = [
    "{tool} AI features",
    "{tool} machine learning",
    "{tool} automation",
    "{tool} artificial intelligence",
    "AI-powered {tool}",
    "{tool} for beginners",
    "{tool} professional use",
];

/// Article keyword ideas for `primary` in `category`: the fixed patterns
/// first, then the AI modifiers. Blank input yields nothing.
#[must_use]
pub fn content_keywords(primary: &str, category: Category) -> Vec<String> {
    let tool = primary.trim();
    if tool.is_empty() {
        return Vec::new();
    }
    let label = category.label();

    PATTERNS
        .iter()
        .chain(AI_MODIFIERS.iter())
        .map(|pattern| pattern.replace("{tool}", tool).replace("{category}", &label))
        .collect()
}
