//! RSS 2.0 and Atom strategy.

use chrono::{DateTime, Duration, Utc};
use feed_rs::model::{Entry, Link};
use reqwest::Client;
use url::Url;
use ad_core::{Article, Error, Result, SourceDescriptor};
use super::HOURS_LOOKBACK;

/// Longest summary taken from an entry body when the feed has no summary.
pub const CONTENT_SUMMARY_CHARS: usize = 500;

pub(crate) async fn fetch(client: &Client, source: &SourceDescriptor, now: DateTime<Utc>) -> Result<Vec<Article>> {
    let response = client.get(&source.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Feed(format!("{} returned HTTP {}", source.url, status)));
    }

    let body = response.bytes().await?;
    parse_feed(&body, source, now)
}

/// Parses an RSS or Atom document and keeps the entries published strictly
/// after `now - 24h`.
pub fn parse_feed(body: &[u8], source: &SourceDescriptor, now: DateTime<Utc>) -> Result<Vec<Article>> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| Error::Feed(format!("failed to parse {}: {}", source.url, e)))?;
    let cutoff = now - Duration::hours(HOURS_LOOKBACK);

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let published = entry.published.or(entry.updated)?;
            if published <= cutoff {
                return None;
            }
            normalize_entry(entry, source, published)
        })
        .collect())
}

fn normalize_entry(entry: Entry, source: &SourceDescriptor, published: DateTime<Utc>) -> Option<Article> {
    let link = primary_link(&entry.links).map(|l| l.href.trim().to_string());
    let id = entry.id.trim().to_string();

    let url = match link {
        Some(link) => link,
        None if is_http_url(&id) => id.clone(),
        None => {
            tracing::debug!("Skipping entry {:?} from {}: no navigable link", id, source.name);
            return None;
        }
    };
    let article_url = (is_http_url(&id) && !same_url(&id, &url)).then_some(id);

    let title = entry
        .title
        .map(|t| t.content.trim().to_string())
        .unwrap_or_default();

    let summary = entry
        .summary
        .map(|s| s.content.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            entry
                .content
                .and_then(|c| c.body)
                .map(|body| truncate_chars(body.trim(), CONTENT_SUMMARY_CHARS))
        });

    Some(Article {
        title,
        url,
        article_url,
        summary,
        source: source.name.clone(),
        category: source.category.clone(),
        published,
    })
}

fn primary_link(links: &[Link]) -> Option<&Link> {
    links
        .iter()
        .filter(|l| !l.href.trim().is_empty())
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| links.iter().find(|l| !l.href.trim().is_empty()))
}

/// True for absolute http(s) URLs with a host; `tag:` and `urn:` identifiers
/// parse as URLs but are not navigable.
pub fn is_http_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Compares parsed forms, since feed links arrive normalized (lowercased
/// host, percent-encoded path) while identifiers keep their raw text.
fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
