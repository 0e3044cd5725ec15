use std::fmt;
use std::time::Duration;
use chrono::Utc;
use reqwest::Client;
use ad_core::{Article, Error, Result, SourceDescriptor};
use crate::logging::Logger;

pub mod rss;

/// Entries older than this (relative to fetch time) are ignored.
pub const HOURS_LOOKBACK: i64 = 24;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("ai-digest/", env!("CARGO_PKG_VERSION"));

/// Fetch strategies, keyed by the `type` field of a source descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// RSS 2.0 or Atom over HTTP.
    Rss,
}

impl FeedKind {
    pub const ALL: &'static [FeedKind] = &[FeedKind::Rss];

    pub fn from_type(kind: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Rss => "rss",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one source. Only `Fetched` contributes articles; the other
/// branches are logged and count as an empty source.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Possibly empty when nothing fell inside the recency window.
    Fetched(Vec<Article>),
    Unsupported { kind: String },
    Failed { error: Error },
}

impl FetchOutcome {
    pub fn into_articles(self) -> Vec<Article> {
        match self {
            FetchOutcome::Fetched(articles) => articles,
            FetchOutcome::Unsupported { .. } | FetchOutcome::Failed { .. } => Vec::new(),
        }
    }
}

pub struct FeedFetcher {
    client: Client,
}

impl fmt::Debug for FeedFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedFetcher")
            .field("client", &"<reqwest::Client>")
            .finish()
    }
}

impl FeedFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches every source in order and concatenates the results. A failing
    /// source contributes nothing and does not stop the batch.
    pub async fn fetch_all(&self, sources: &[SourceDescriptor]) -> Vec<Article> {
        let mut articles = Vec::new();
        for source in sources {
            articles.extend(self.fetch_source(source).await);
        }
        tracing::info!("Fetched {} articles from {} sources", articles.len(), sources.len());
        articles
    }

    /// Never fails: unsupported types and fetch/parse errors yield `[]`.
    pub async fn fetch_source(&self, source: &SourceDescriptor) -> Vec<Article> {
        let logger = Logger::new().with_prefix(format!("[{}]", source.name));
        let outcome = self.try_fetch_source(source).await;
        match &outcome {
            FetchOutcome::Fetched(articles) => {
                logger.info(&format!("{} recent entries", articles.len()));
            }
            FetchOutcome::Unsupported { kind } => {
                logger.warn(&format!("Unknown source type: {}", kind));
            }
            FetchOutcome::Failed { error } => {
                logger.error(&format!("Error fetching {}: {}", source.url, error));
            }
        }
        outcome.into_articles()
    }

    pub async fn try_fetch_source(&self, source: &SourceDescriptor) -> FetchOutcome {
        let Some(kind) = FeedKind::from_type(&source.kind) else {
            return FetchOutcome::Unsupported {
                kind: source.kind.clone(),
            };
        };

        let result = match kind {
            FeedKind::Rss => rss::fetch(&self.client, source, Utc::now()).await,
        };

        match result {
            Ok(articles) => FetchOutcome::Fetched(articles),
            Err(error) => FetchOutcome::Failed { error },
        }
    }
}
