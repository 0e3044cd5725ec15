use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One configured feed to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    /// Selects the fetch strategy (`rss` covers RSS 2.0 and Atom).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
}

/// A feed entry that passed the recency window, normalized for the summarizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Direct-navigation link.
    pub url: String,
    /// Set only when the entry identifier is itself a distinct http(s) link,
    /// e.g. an aggregator's discussion page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
    pub summary: Option<String>,
    pub source: String,
    pub category: String,
    pub published: DateTime<Utc>,
}

impl Article {
    /// The identifier link when there is one, otherwise `url`.
    pub fn article_link(&self) -> &str {
        self.article_url.as_deref().unwrap_or(&self.url)
    }
}

/// One curated item of a daily digest, as returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestItem {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub summary: String,
    /// Unordered labels; order is whatever the model produced.
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
}

impl DigestItem {
    /// The secondary link worth showing, if it differs from `url`.
    pub fn distinct_article_url(&self) -> Option<&str> {
        distinct(&self.url, self.article_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyItem {
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub why_it_matters: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_url: Option<String>,
}

impl WeeklyItem {
    pub fn distinct_article_url(&self) -> Option<&str> {
        distinct(&self.url, self.article_url.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub theme: String,
    #[serde(default)]
    pub items: Vec<WeeklyItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyResult {
    #[serde(default)]
    pub themes: Vec<Theme>,
}

impl WeeklyResult {
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn item_count(&self) -> usize {
        self.themes.iter().map(|t| t.items.len()).sum()
    }

    /// Keeps at most `max_items` items across all themes, in order, and drops
    /// themes left without items.
    pub fn truncate_items(&mut self, max_items: usize) {
        let mut remaining = max_items;
        for theme in &mut self.themes {
            let keep = theme.items.len().min(remaining);
            theme.items.truncate(keep);
            remaining -= keep;
        }
        self.themes.retain(|t| !t.items.is_empty());
    }
}

fn distinct<'a>(url: &str, article_url: Option<&'a str>) -> Option<&'a str> {
    article_url.filter(|a| !a.is_empty() && *a != url)
}
