//! `collect` and `sources` command handlers.
//!
//! Source failures never abort a run: the pipeline reports them and the
//! handlers print one line per source. Only an artifact write failure, or an
//! empty run without `--allow-empty`, makes the command fail.

use chrono::Utc;
use trendscout_core::{AppConfig, Registry};
use trendscout_signals::{
    run_keyword_discovery, write_artifacts, ArtifactPaths, ControversyAnalysis, KeywordRecord,
    SignalCollector, SourceKind, SourceOutcome, SourceReport,
};

/// Run keyword discovery and write the handoff files.
///
/// When `dry_run` is `true` the results are printed and nothing is written.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, an artifact cannot be
/// written, or no topic was collected and `allow_empty` is `false`. The empty
/// artifacts are still written in that last case.
pub(crate) async fn run_collect(
    config: &AppConfig,
    registry: &Registry,
    dry_run: bool,
    allow_empty: bool,
) -> anyhow::Result<()> {
    let collector = SignalCollector::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

    let run = run_keyword_discovery(&collector, registry, config.max_keywords, Utc::now()).await;

    for report in &run.reports {
        println!("{}", format_report(report));
    }
    for (rank, record) in run.keywords.iter().enumerate() {
        println!("{}", format_keyword(rank + 1, record));
    }
    println!("{}", format_controversy(&run.summary.controversy_analysis));

    let paths = ArtifactPaths::from_config(config);
    if dry_run {
        println!(
            "dry-run: would write {} keywords to {} and the summary to {}",
            run.keywords.len(),
            paths.keywords.display(),
            paths.notification.display()
        );
    } else {
        write_artifacts(&paths, &run)?;
        println!(
            "wrote {} keywords to {}",
            run.keywords.len(),
            paths.keywords.display()
        );
    }

    if run.topics.is_empty() && !allow_empty {
        anyhow::bail!("no topics collected from any source (use --allow-empty to accept)");
    }
    Ok(())
}

/// Print each source with its configuration state.
pub(crate) fn print_sources(config: &AppConfig, registry: &Registry) {
    for kind in SourceKind::ALL {
        println!("{}", format_source(kind, config, registry));
    }
}

fn format_report(report: &SourceReport) -> String {
    let status = match &report.outcome {
        SourceOutcome::Collected(count) => format!("ok      {count} topics"),
        SourceOutcome::Skipped(reason) => format!("skipped {reason}"),
        SourceOutcome::Failed(error) => format!("failed  {error}"),
    };
    format!("{:<14} {status}", report.source.as_str())
}

fn format_keyword(rank: usize, record: &KeywordRecord) -> String {
    let trending = if record.is_trending_topic { " [trending]" } else { "" };
    format!(
        "{rank:>2}. {} (score {}, controversy {}, {}){trending}",
        record.keyword, record.score, record.controversy_score, record.category
    )
}

fn format_controversy(analysis: &ControversyAnalysis) -> String {
    let topic = analysis.topic.as_deref().unwrap_or("none");
    format!(
        "controversy: {} risk, {} trend, top topic {topic} ({})",
        analysis.risk_level.as_str(),
        analysis.trend.as_str(),
        analysis.recommended_action
    )
}

fn format_source(kind: SourceKind, config: &AppConfig, registry: &Registry) -> String {
    let state = if kind.is_configured(config) {
        "ready"
    } else {
        "missing credentials"
    };
    let targets = match kind {
        SourceKind::GoogleTrends => format!(
            "{} seeds",
            registry.trend_seeds(config.trends_seeds_per_category).len()
        ),
        SourceKind::Reddit => format!("{} subreddits", registry.subreddits.len()),
        SourceKind::NewsApi => format!("{} tools", registry.tools.len().min(5)),
        SourceKind::HackerNews => "top stories".to_string(),
        SourceKind::Rss => format!("{} feeds", registry.rss_feeds.len()),
    };
    format!(
        "{:<14} {state:<20} {targets:<14} {}",
        kind.as_str(),
        kind.description()
    )
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
