//! Reference data the pipeline matches against: known AI tools, category
//! matchers, the controversy lexicon, sentiment words, feeds and thresholds.
//!
//! The built-in [`Registry::default`] covers the AI-tools niche. A YAML file
//! can override any subset of fields; missing fields fall back to the defaults.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Closed classification of AI tools used for content routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ContentCreation,
    ImageGeneration,
    CodeAssistance,
    Productivity,
    DataAnalysis,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::ContentCreation => "content_creation",
            Category::ImageGeneration => "image_generation",
            Category::CodeAssistance => "code_assistance",
            Category::Productivity => "productivity",
            Category::DataAnalysis => "data_analysis",
        }
    }

    /// Human-readable form, e.g. `"content creation"`.
    #[must_use]
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "content_creation" => Ok(Category::ContentCreation),
            "image_generation" => Ok(Category::ImageGeneration),
            "code_assistance" => Ok(Category::CodeAssistance),
            "productivity" => Ok(Category::Productivity),
            "data_analysis" => Ok(Category::DataAnalysis),
            other => Err(ConfigError::Validation(format!("unknown category '{other}'"))),
        }
    }
}

/// Matchers and trend seeds for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    /// Lowercase substrings that classify a keyword into this category.
    #[serde(default)]
    pub matchers: Vec<String>,
    /// Keywords queried against the trends source for this category.
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Negative/problem markers and the fixed weight each match contributes.
///
/// Markers are matched by substring against related terms. Most collectors
/// build related terms from single words longer than four characters, so a
/// multi-word marker only matches Google Trends related queries, and a short
/// marker such as `bug` only matches inside a longer word (`bugged`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControversyLexicon {
    pub terms: Vec<String>,
    pub weight: u32,
}

impl Default for ControversyLexicon {
    fn default() -> Self {
        Self {
            terms: to_strings(&[
                "problem",
                "issue",
                "bug",
                "error",
                "fail",
                "broken",
                "worse",
                "downgrade",
                "decline",
                "controversy",
                "scandal",
                "criticism",
                "lawsuit",
                "banned",
                "restricted",
                "censored",
                "terrible",
                "awful",
                "horrible",
                "disaster",
                "scam",
                "ripoff",
                "问题",
                "故障",
                "降智",
                "性能下降",
                "争议",
                "批评",
                "投诉",
                "失望",
                "翻车",
            ]),
            weight: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// A record is a trending topic when its score exceeds this...
    pub trending_score: u32,
    /// ...or its controversy score exceeds this.
    pub trending_controversy: u32,
    /// Controversy above this is called out in the selection reason.
    pub controversy_alert: u32,
    /// Records scoring above this count as high-value in the summary.
    pub high_value_score: u32,
    /// Minimum controversy for a topic to appear in the summary's top list.
    pub top_controversy_floor: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            trending_score: 80,
            trending_controversy: 20,
            controversy_alert: 30,
            high_value_score: 80,
            top_controversy_floor: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Registry {
    /// Tool names; the first one mentioned in a title becomes its keyword.
    pub tools: Vec<String>,
    pub categories: Vec<CategoryRule>,
    pub default_category: Category,
    pub controversy: ControversyLexicon,
    pub positive_terms: Vec<String>,
    pub negative_terms: Vec<String>,
    pub commercial_terms: Vec<String>,
    pub stopwords: Vec<String>,
    pub subreddits: Vec<String>,
    pub rss_feeds: Vec<String>,
    pub thresholds: Thresholds,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            tools: to_strings(&[
                "ChatGPT",
                "Claude AI",
                "Claude",
                "GPT-4",
                "GPT-5",
                "Gemini",
                "Perplexity",
                "Character.AI",
                "Midjourney",
                "DALL-E",
                "Stable Diffusion",
                "GitHub Copilot",
                "Anthropic",
                "OpenAI",
                "Google AI",
            ]),
            categories: vec![
                CategoryRule {
                    category: Category::ContentCreation,
                    matchers: to_strings(&[
                        "chatgpt",
                        "claude",
                        "jasper",
                        "copy.ai",
                        "writesonic",
                        "perplexity",
                        "character.ai",
                    ]),
                    seeds: to_strings(&[
                        "ChatGPT",
                        "Claude AI",
                        "Jasper AI",
                        "Copy.ai",
                        "Writesonic",
                        "AI writing assistant",
                    ]),
                },
                CategoryRule {
                    category: Category::ImageGeneration,
                    matchers: to_strings(&["midjourney", "dall-e", "stable diffusion", "firefly"]),
                    seeds: to_strings(&[
                        "Midjourney",
                        "DALL-E",
                        "Stable Diffusion",
                        "Adobe Firefly",
                        "AI image generator",
                    ]),
                },
                CategoryRule {
                    category: Category::CodeAssistance,
                    matchers: to_strings(&["copilot", "codewhisperer", "tabnine", "codeium"]),
                    seeds: to_strings(&[
                        "GitHub Copilot",
                        "CodeWhisperer",
                        "Tabnine",
                        "Codeium",
                        "AI coding assistant",
                    ]),
                },
                CategoryRule {
                    category: Category::Productivity,
                    matchers: to_strings(&["notion", "todoist", "zapier", "calendly"]),
                    seeds: to_strings(&["Notion AI", "Zapier AI", "Todoist AI", "task automation"]),
                },
                CategoryRule {
                    category: Category::DataAnalysis,
                    matchers: to_strings(&["datarobot", "h2o.ai", "tableau", "power bi"]),
                    seeds: to_strings(&["DataRobot", "H2O.ai", "Tableau AI", "AI analytics"]),
                },
            ],
            default_category: Category::ContentCreation,
            controversy: ControversyLexicon::default(),
            positive_terms: to_strings(&[
                "great",
                "amazing",
                "good",
                "excellent",
                "better",
                "improved",
            ]),
            negative_terms: to_strings(&["bad", "terrible", "worse", "problem", "issue", "fail"]),
            commercial_terms: to_strings(&[
                "pricing",
                "cost",
                "buy",
                "purchase",
                "subscription",
                "plan",
                "review",
                "vs",
                "alternative",
                "best",
            ]),
            stopwords: to_strings(&["that", "this", "with", "from", "they", "have", "been", "will"]),
            subreddits: to_strings(&[
                "artificial",
                "MachineLearning",
                "OpenAI",
                "ChatGPT",
                "singularity",
            ]),
            rss_feeds: to_strings(&[
                "https://feeds.feedburner.com/oreilly/radar/ai",
                "https://techcrunch.com/category/artificial-intelligence/feed/",
                "https://www.technologyreview.com/topic/artificial-intelligence/feed/",
                "https://venturebeat.com/ai/feed/",
                "https://www.artificialintelligence-news.com/feed/",
            ]),
            thresholds: Thresholds::default(),
        }
    }
}

impl Registry {
    /// Classify a keyword by the first category whose matcher it contains.
    ///
    /// Falls back to `default_category` when nothing matches.
    #[must_use]
    pub fn category_for(&self, keyword: &str) -> Category {
        let lower = keyword.to_lowercase();
        self.categories
            .iter()
            .find(|rule| {
                rule.matchers
                    .iter()
                    .any(|m| !m.is_empty() && lower.contains(&m.to_lowercase()))
            })
            .map_or(self.default_category, |rule| rule.category)
    }

    /// The first registered tool mentioned (case-insensitively) in `text`.
    #[must_use]
    pub fn find_tool(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.tools
            .iter()
            .find(|tool| lower.contains(&tool.to_lowercase()))
            .map(String::as_str)
    }

    #[must_use]
    pub fn mentions_tool(&self, text: &str) -> bool {
        self.find_tool(text).is_some()
    }

    /// Trend seeds: the first `per_category` seeds of every category, in order.
    #[must_use]
    pub fn trend_seeds(&self, per_category: usize) -> Vec<&str> {
        self.categories
            .iter()
            .flat_map(|rule| rule.seeds.iter().take(per_category).map(String::as_str))
            .collect()
    }
}

/// Load and validate a registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_registry(path: &Path) -> Result<Registry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RegistryFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_registry(&content)
}

/// Parse and validate registry YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_registry(yaml: &str) -> Result<Registry, ConfigError> {
    let registry: Registry = serde_yaml::from_str(yaml).map_err(ConfigError::RegistryFileParse)?;
    validate_registry(&registry)?;
    Ok(registry)
}

fn validate_registry(registry: &Registry) -> Result<(), ConfigError> {
    if registry.tools.iter().all(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "at least one tool name is required".to_string(),
        ));
    }

    if registry.controversy.weight == 0 {
        return Err(ConfigError::Validation(
            "controversy weight must be greater than zero".to_string(),
        ));
    }

    if registry.controversy.terms.iter().any(|t| t.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "controversy terms must be non-empty".to_string(),
        ));
    }

    if registry.controversy.terms.is_empty() {
        return Err(ConfigError::Validation(
            "controversy lexicon must contain at least one term".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &registry.categories {
        if !seen.insert(rule.category) {
            return Err(ConfigError::Validation(format!(
                "duplicate category rule: '{}'",
                rule.category
            )));
        }
    }

    Ok(())
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
