use clap::{Args, Subcommand};
use ad_core::{AppConfig, Error, Result, SourceDescriptor};
use crate::fetchers::{FeedFetcher, FeedKind};

#[derive(Args, Debug, Clone)]
pub struct SourcesArgs {
    #[command(subcommand)]
    pub command: SourcesCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SourcesCommands {
    /// List configured sources
    List,
    /// Fetch recent entries without summarizing them
    Fetch {
        /// Only fetch the source with this name
        name: Option<String>,
    },
}

pub async fn handle_command(args: SourcesArgs, config: &AppConfig) -> Result<()> {
    match args.command {
        SourcesCommands::List => {
            for source in &config.sources {
                println!("{}", describe(source));
            }
        }
        SourcesCommands::Fetch { name } => {
            let sources = select_sources(&config.sources, name.as_deref())?;
            let fetcher = FeedFetcher::new()?;
            let articles = fetcher.fetch_all(&sources).await;
            println!("Found {} recent articles", articles.len());
            for article in articles {
                println!("- [{}] {} - {}", article.source, article.title, article.url);
                if let Some(article_url) = &article.article_url {
                    println!("  discussion: {}", article_url);
                }
            }
        }
    }
    Ok(())
}

fn describe(source: &SourceDescriptor) -> String {
    let marker = if FeedKind::from_type(&source.kind).is_some() { "" } else { " (unsupported)" };
    format!(
        "{} [{}{}] {} - {}",
        source.name, source.kind, marker, source.category, source.url
    )
}

fn select_sources(sources: &[SourceDescriptor], name: Option<&str>) -> Result<Vec<SourceDescriptor>> {
    match name {
        None => Ok(sources.to_vec()),
        Some(name) => {
            let selected: Vec<_> = sources
                .iter()
                .filter(|s| s.name.eq_ignore_ascii_case(name))
                .cloned()
                .collect();
            if selected.is_empty() {
                return Err(Error::Config(format!("Source not found: {}", name)));
            }
            Ok(selected)
        }
    }
}
