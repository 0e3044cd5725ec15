use std::path::PathBuf;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::{error, info, warn};
use ad_core::{AppConfig, DigestItem, Result, TextModel, WeeklyResult};
use ad_feeds::FeedFetcher;
use ad_inference::{window_start, DailySummarizer, WeeklyCurator};
use ad_publish::SlackPublisher;
use ad_storage::DigestStore;

/// How a run delivers its result once the artifact is saved.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    pub test_mode: bool,
    pub no_post: bool,
}

#[derive(Debug)]
pub struct DailyReport {
    pub items: Vec<DigestItem>,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct WeeklyReport {
    pub result: WeeklyResult,
    pub start: NaiveDate,
    pub path: PathBuf,
}

pub async fn run_daily(
    config: &AppConfig,
    model: Arc<dyn TextModel>,
    today: NaiveDate,
    options: PublishOptions,
) -> Result<DailyReport> {
    info!("🦗 Fetching {} sources", config.sources.len());
    let articles = FeedFetcher::new()?.fetch_all(&config.sources).await;
    info!("📰 {} recent articles", articles.len());

    let items = DailySummarizer::new(model)
        .summarize(&articles, &config.settings)
        .await?;

    let path = DigestStore::from_config(config).save_daily(&items, today)?;

    if let Some(publisher) = publisher(config, options) {
        if let Err(e) = publisher.post_daily(&items, today).await {
            error!("Failed to post daily digest: {}", e);
        }
    }

    Ok(DailyReport { items, path })
}

pub async fn run_weekly(
    config: &AppConfig,
    model: Arc<dyn TextModel>,
    today: NaiveDate,
    options: PublishOptions,
) -> Result<WeeklyReport> {
    let start = window_start(today, config.settings.weekly.lookback_days);
    info!("📚 Curating digests from {} to {}", start, today);

    let result = WeeklyCurator::new(model).curate(config, today).await?;
    let path = DigestStore::from_config(config).save_weekly(&result, start, today)?;

    if let Some(publisher) = publisher(config, options) {
        if let Err(e) = publisher.post_weekly(&result, start, today).await {
            error!("Failed to post weekly digest: {}", e);
        }
    }

    Ok(WeeklyReport { result, start, path })
}

fn publisher(config: &AppConfig, options: PublishOptions) -> Option<SlackPublisher> {
    if options.no_post {
        info!("Skipping Slack (--no-post)");
        return None;
    }
    let publisher = SlackPublisher::from_settings(&config.settings.slack, options.test_mode);
    if publisher.is_none() {
        if options.test_mode {
            warn!("Slack test webhook not configured, set slack.test_webhook_url in config/settings.local.yml");
        } else {
            warn!(
                "Slack webhook not configured, set slack.webhook_url in config/settings.local.yml or {}",
                ad_publish::WEBHOOK_ENV
            );
        }
    }
    publisher
}
