//! Trending-topic signals and keyword ranking for trendscout.
//!
//! Collects AI-tool topics from Google Trends, Reddit, NewsAPI, Hacker News
//! and RSS feeds, scores each one for controversy against the registry
//! lexicon, merges and ranks them into keyword records, assesses the run's
//! overall controversy, and writes the JSON artifacts the content scripts
//! consume.

pub mod controversy;
pub mod error;
pub mod handoff;
pub mod longtail;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod sources;
pub mod types;

mod text;

pub use controversy::{
    analyze_controversy, ControversyAnalysis, ControversyKind, RiskLevel, TrendDirection,
};
pub use error::SignalError;
pub use handoff::{
    build_summary, write_artifacts, ArtifactPaths, NotificationSummary, PrimaryKeyword, TopicCache,
};
pub use longtail::content_keywords;
pub use pipeline::{analyze_topics, run_keyword_discovery, Analysis, DiscoveryRun};
pub use ranker::{dedupe_topics, rank_keywords};
pub use scorer::{controversy_score, score_controversy};
pub use sources::{Endpoints, SignalCollector, SourceKind, SourceOutcome, SourceReport};
pub use types::{Difficulty, KeywordRecord, Sentiment, Topic};
