use std::path::PathBuf;
use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use ad_core::AppConfig;
use ad_feeds::{handle_command, init_logging, SourcesArgs};
use ad_inference::create_model;

mod pipeline;

use pipeline::{run_daily, run_weekly, PublishOptions};

#[derive(Parser, Debug)]
#[command(name = "ai-digest", author, version, about = "Daily and weekly AI news digests", long_about = None)]
pub struct Cli {
    /// Directory holding config/ and the relative storage path
    #[arg(long, default_value = ".")]
    root: PathBuf,
    #[arg(long, default_value = "bedrock", help = "Model to use for inference. Available models: bedrock (default), dummy")]
    model: String,
    #[arg(long, default_value = "info")]
    log_level: Level,
    /// Post to slack.test_webhook_url instead of the production webhook
    #[arg(long)]
    test: bool,
    /// Save the digest without posting it
    #[arg(long)]
    no_post: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, summarize, save and post today's digest
    Daily,
    /// Curate the last week of daily digests
    Weekly,
    /// Inspect configured sources
    Sources(SourcesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = AppConfig::load(&cli.root)
        .with_context(|| format!("loading configuration from {}", cli.root.display()))?;
    info!("⚙️ Loaded {} sources from {}", config.sources.len(), cli.root.display());

    let options = PublishOptions {
        test_mode: cli.test,
        no_post: cli.no_post,
    };
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Daily => {
            let model = create_model(&cli.model, &config.settings)?;
            info!("🧠 Inference model initialized (using {})", model.name());
            let report = run_daily(&config, model, today, options).await?;
            info!("💾 Saved {} items to {}", report.items.len(), report.path.display());
        }
        Commands::Weekly => {
            let model = create_model(&cli.model, &config.settings)?;
            info!("🧠 Inference model initialized (using {})", model.name());
            let report = run_weekly(&config, model, today, options).await?;
            info!(
                "💾 Saved {} items in {} themes to {}",
                report.result.item_count(),
                report.result.themes.len(),
                report.path.display()
            );
        }
        Commands::Sources(args) => handle_command(args, &config).await?,
    }

    Ok(())
}
