//! Daily stage: one prompt over the day's articles, parsed into digest items.

use std::fmt;
use std::sync::Arc;
use tracing::info;
use ad_core::{Article, DigestItem, GenerationRequest, Result, Settings, TextModel};
use crate::response::ResponseOutcome;

/// Longest article description included in the prompt.
pub const DESCRIPTION_CHARS: usize = 300;

pub fn build_prompt(articles: &[Article], settings: &Settings) -> String {
    let topics = settings
        .topics
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");

    let items = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let mut lines = vec![
                format!("{}. [{}] {}", i + 1, article.source, article.title),
                format!("   URL: {}", article.url),
            ];
            if let Some(article_url) = &article.article_url {
                lines.push(format!("   Article-URL: {}", article_url));
            }
            let description: String = article
                .summary
                .as_deref()
                .unwrap_or_default()
                .chars()
                .take(DESCRIPTION_CHARS)
                .collect();
            lines.push(format!("   Description: {}", description));
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are an AI news curator. Below are today's items from various AI/tech sources.

Filter to ONLY items relevant to these topics:
{topics}

For each relevant item, return a JSON array of objects with these fields:
- "title": the item title
- "source": the source name
- "summary": a 2-3 sentence summary of why this is relevant
- "tags": array of short topic tags (e.g., "coding-agent", "model-release", "dev-tooling")
- "url": the item URL
- "article_url": the item's Article-URL, only when the item lists one

Rank by importance. Return at most {max_items} items.
Return ONLY a single valid JSON array, with no markdown fences and no extra text.

Items:
{items}
"#,
        topics = topics,
        max_items = settings.max_items_per_digest,
        items = items
    )
}

/// Malformed output degrades to no items.
pub fn parse_response(text: &str) -> Vec<DigestItem> {
    ResponseOutcome::parse(text).or_default_logged("summarizer")
}

pub struct DailySummarizer {
    model: Arc<dyn TextModel>,
}

impl fmt::Debug for DailySummarizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailySummarizer")
            .field("model", &self.model.name())
            .finish()
    }
}

impl DailySummarizer {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    /// Model failures are returned to the caller; malformed output is not.
    pub async fn call_model(&self, prompt: String, settings: &Settings) -> Result<String> {
        let request = GenerationRequest {
            prompt,
            model_id: settings.bedrock.model_id.clone(),
            region: settings.bedrock.region.clone(),
            max_output_tokens: settings.bedrock.max_tokens,
        };
        self.model.generate(&request).await
    }

    pub async fn summarize(&self, articles: &[Article], settings: &Settings) -> Result<Vec<DigestItem>> {
        if articles.is_empty() {
            info!("No articles to summarize");
            return Ok(Vec::new());
        }

        info!("🤖 Summarizing {} articles with {}", articles.len(), self.model.name());
        let prompt = build_prompt(articles, settings);
        let text = self.call_model(prompt, settings).await?;

        let mut items = parse_response(&text);
        items.truncate(settings.max_items_per_digest);
        info!("✨ {} digest items selected", items.len());
        Ok(items)
    }
}
