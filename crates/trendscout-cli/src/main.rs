mod collect;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trendscout_core::{AppConfig, Category, Registry};

#[derive(Debug, Parser)]
#[command(name = "trendscout")]
#[command(about = "Trending AI-tool keyword discovery")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect signals, rank keywords and write the handoff files
    Collect {
        /// Run the pipeline and print results without writing any file
        #[arg(long)]
        dry_run: bool,
        /// Exit successfully even when no source produced a topic
        #[arg(long)]
        allow_empty: bool,
    },
    /// Print long-tail content keywords for a primary keyword
    Expand {
        #[arg(long)]
        keyword: String,
        /// Category override (e.g. `image_generation`); inferred when omitted
        #[arg(long)]
        category: Option<String>,
    },
    /// List signal sources and whether they are configured
    Sources,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = trendscout_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = load_registry(&config)?;

    match cli.command {
        Some(Commands::Collect {
            dry_run,
            allow_empty,
        }) => collect::run_collect(&config, &registry, dry_run, allow_empty).await?,
        Some(Commands::Expand { keyword, category }) => {
            let category = match category {
                Some(raw) => raw.parse::<Category>()?,
                None => registry.category_for(&keyword),
            };
            for line in trendscout_signals::content_keywords(&keyword, category) {
                println!("{line}");
            }
        }
        Some(Commands::Sources) => collect::print_sources(&config, &registry),
        None => println!("trendscout: no command given, try --help"),
    }

    Ok(())
}

fn load_registry(config: &AppConfig) -> anyhow::Result<Registry> {
    match &config.registry_path {
        Some(path) => {
            let registry = trendscout_core::load_registry(path)?;
            tracing::debug!(path = %path.display(), "loaded registry");
            Ok(registry)
        }
        None => Ok(Registry::default()),
    }
}
