//! Weekly stage: rolls the last `lookback_days` daily digests into themes.

use std::fmt;
use std::fs;
use std::sync::Arc;
use chrono::{Days, NaiveDate};
use tracing::{debug, info, warn};
use ad_core::{AppConfig, GenerationRequest, Result, Settings, TextModel, WeeklyResult};
use ad_storage::DigestStore;
use crate::response::ResponseOutcome;

/// Placed between consecutive daily digests in the weekly prompt.
pub const DIGEST_SEPARATOR: &str = "\n\n---\n\n";

/// First day of the window ending at `today` (inclusive on both ends).
pub fn window_start(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    let span = u64::from(lookback_days.max(1) - 1);
    today.checked_sub_days(Days::new(span)).unwrap_or(NaiveDate::MIN)
}

/// Concatenated text of the daily digests dated within the lookback window,
/// oldest first. Empty when nothing qualifies.
pub fn load_week(config: &AppConfig, today: NaiveDate) -> Result<String> {
    let store = DigestStore::from_config(config);
    let cutoff = window_start(today, config.settings.weekly.lookback_days);

    let mut texts = Vec::new();
    for artifact in store.daily_artifacts()? {
        if artifact.date < cutoff {
            debug!("Skipping {} (before {})", artifact.path.display(), cutoff);
            continue;
        }
        match fs::read_to_string(&artifact.path) {
            Ok(text) => texts.push(text),
            Err(e) => warn!("Skipping unreadable digest {}: {}", artifact.path.display(), e),
        }
    }

    debug!("Loaded {} daily digests since {}", texts.len(), cutoff);
    Ok(texts.join(DIGEST_SEPARATOR))
}

pub fn build_prompt(digests_text: &str, settings: &Settings) -> String {
    let topics = settings
        .topics
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n");
    let max_items = settings.weekly.max_items;

    format!(
        r#"You are an AI news curator creating a weekly "best of" digest. Below are the daily digests from this past week.

Your job:
1. Identify the {max_items} most significant developments from the week
2. Group them by theme (2-3 themes)
3. If the same topic appeared multiple days or from multiple sources, that signals higher significance
4. For each item, explain why it matters this week

Focus on these topics:
{topics}

Return a JSON object with this structure:
{{
  "themes": [
    {{
      "theme": "Theme Name",
      "items": [
        {{
          "title": "Item title",
          "source": "Source name",
          "why_it_matters": "2-3 sentences on why this is significant this week",
          "url": "https://...",
          "article_url": "https://... (only when the digest lists a separate Source link)"
        }}
      ]
    }}
  ]
}}

Total items across all themes must be at most {max_items}.
Return ONLY a single valid JSON object, with no markdown fences and no extra text.

This week's daily digests:

{digests_text}
"#
    )
}

/// Malformed output degrades to `{themes: []}`.
pub fn parse_response(text: &str) -> WeeklyResult {
    ResponseOutcome::parse(text).or_default_logged("weekly curator")
}

pub struct WeeklyCurator {
    model: Arc<dyn TextModel>,
}

impl fmt::Debug for WeeklyCurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeeklyCurator")
            .field("model", &self.model.name())
            .finish()
    }
}

impl WeeklyCurator {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub async fn call_model(&self, prompt: String, settings: &Settings) -> Result<String> {
        let request = GenerationRequest {
            prompt,
            model_id: settings.weekly_model_id().to_string(),
            region: settings.bedrock.region.clone(),
            max_output_tokens: settings.bedrock.max_tokens,
        };
        self.model.generate(&request).await
    }

    pub async fn curate(&self, config: &AppConfig, today: NaiveDate) -> Result<WeeklyResult> {
        let digests_text = load_week(config, today)?;
        if digests_text.is_empty() {
            info!("No daily digests in the last {} days", config.settings.weekly.lookback_days);
            return Ok(WeeklyResult::default());
        }

        info!("🤖 Curating the week with {}", self.model.name());
        let prompt = build_prompt(&digests_text, &config.settings);
        let text = self.call_model(prompt, &config.settings).await?;

        let mut result = parse_response(&text);
        result.truncate_items(config.settings.weekly.max_items);
        info!(
            "✨ {} items across {} themes",
            result.item_count(),
            result.themes.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ad_core::config::WeeklySettings;
    use ad_core::dates::ISO_DATE;
    use tempfile::TempDir;
    use crate::models::DummyModel;

    const RESPONSE: &str = r#"{
  "themes": [
    {
      "theme": "Agentic Engineering",
      "items": [
        {
          "title": "Agentic Patterns",
          "source": "Simon Willison",
          "why_it_matters": "Defines best practices for AI-assisted development.",
          "url": "https://example.com/patterns"
        }
      ]
    }
  ]
}"#;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn config(dir: &TempDir) -> AppConfig {
        let mut settings = Settings {
            topics: vec!["AI coding agents and assistants".to_string()],
            weekly: WeeklySettings {
                model_id: Some("weekly-model".to_string()),
                max_items: 5,
                lookback_days: 7,
            },
            ..Settings::default()
        };
        settings.storage.path = dir.path().to_string_lossy().into_owned();
        AppConfig::new("/nonexistent-root", settings, vec![])
    }

    fn write_daily(dir: &TempDir, date: NaiveDate, body: &str) {
        let name = format!("{}.md", date.format(ISO_DATE));
        fs::write(dir.path().join(name), body).unwrap();
    }

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(today(), 7), days_ago(6));
        assert_eq!(window_start(today(), 1), today());
        assert_eq!(window_start(today(), 0), today());
    }

    #[test]
    fn test_load_week_window() {
        let dir = TempDir::new().unwrap();
        for (n, label) in [(0, "Today"), (1, "Yesterday"), (6, "Six"), (7, "Seven"), (10, "Ten")] {
            write_daily(&dir, days_ago(n), &format!("## 1. {} Article", label));
        }

        let text = load_week(&config(&dir), today()).unwrap();

        assert_eq!(
            text,
            ["## 1. Six Article", "## 1. Yesterday Article", "## 1. Today Article"].join(DIGEST_SEPARATOR)
        );
    }

    #[test]
    fn test_load_week_skips_weekly_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("weekly-{}.md", today().format(ISO_DATE))), "# Weekly\n\nstuff").unwrap();
        write_daily(&dir, today(), "# AI Digest\n\n## 1. Daily Article\nContent.");

        let text = load_week(&config(&dir), today()).unwrap();

        assert!(text.contains("Daily Article"));
        assert!(!text.contains("Weekly"));
    }

    #[test]
    fn test_load_week_skips_unparsable_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("draft.md"), "Draft Article").unwrap();
        write_daily(&dir, today(), "Daily Article");

        assert_eq!(load_week(&config(&dir), today()).unwrap(), "Daily Article");
    }

    #[test]
    fn test_load_week_skips_unreadable_artifacts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("2026-10-16.md"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        write_daily(&dir, today(), "Daily Article");

        assert_eq!(load_week(&config(&dir), today()).unwrap(), "Daily Article");
    }

    #[test]
    fn test_load_week_excludes_boundary_day() {
        let dir = TempDir::new().unwrap();
        write_daily(&dir, days_ago(7), "# AI Digest\n\n## 1. Boundary Article\nContent.");

        assert_eq!(load_week(&config(&dir), today()).unwrap(), "");
    }

    #[test]
    fn test_load_week_resolves_relative_path_against_root() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("digests")).unwrap();
        fs::write(root.path().join("digests").join("2026-10-17.md"), "Relative Article").unwrap();
        let config = AppConfig::new(root.path(), Settings::default(), vec![]);

        assert_eq!(load_week(&config, today()).unwrap(), "Relative Article");
    }

    #[test]
    fn test_build_prompt_includes_digests_and_config() {
        let dir = TempDir::new().unwrap();
        let digests_text = "# AI Digest — Oct 17\n\n## 1. Article A\nSummary A.";

        let prompt = build_prompt(digests_text, &config(&dir).settings);

        assert!(prompt.ends_with("This week's daily digests:\n\n# AI Digest — Oct 17\n\n## 1. Article A\nSummary A.\n"));
        assert!(prompt.contains("Identify the 5 most significant"));
        assert!(prompt.contains("at most 5."));
        assert!(prompt.contains("\"themes\""));
        assert!(prompt.contains("why_it_matters"));
        assert!(prompt.contains("article_url"));
        assert!(prompt.contains("- AI coding agents and assistants"));
    }

    #[test]
    fn test_parse_response_extracts_themed_items() {
        let result = parse_response(RESPONSE);

        assert_eq!(result.themes.len(), 1);
        assert_eq!(result.themes[0].theme, "Agentic Engineering");
        assert_eq!(result.themes[0].items[0].title, "Agentic Patterns");
        assert_eq!(parse_response(&format!("```json\n{}\n```", RESPONSE)), result);
    }

    #[test]
    fn test_parse_response_handles_malformed_json() {
        assert_eq!(parse_response("not json"), WeeklyResult::default());
    }

    #[tokio::test]
    async fn test_curate_without_digests_skips_model() {
        let dir = TempDir::new().unwrap();
        let model = Arc::new(DummyModel::new(RESPONSE));
        let curator = WeeklyCurator::new(model.clone());

        let result = curator.curate(&config(&dir), today()).await.unwrap();

        assert_eq!(result, WeeklyResult::default());
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_curate_uses_weekly_model() {
        let dir = TempDir::new().unwrap();
        write_daily(&dir, days_ago(2), "## 1. Agentic Patterns");
        let model = Arc::new(DummyModel::new(RESPONSE));
        let curator = WeeklyCurator::new(model.clone());

        let result = curator.curate(&config(&dir), today()).await.unwrap();

        assert_eq!(result.item_count(), 1);
        let request = model.last_request().unwrap();
        assert_eq!(request.model_id, "weekly-model");
        assert!(request.prompt.contains("## 1. Agentic Patterns"));
    }

    #[tokio::test]
    async fn test_curate_caps_total_items() {
        let dir = TempDir::new().unwrap();
        write_daily(&dir, today(), "digest");
        let item = r#"{"title": "T", "source": "S", "why_it_matters": "W", "url": "https://x.com"}"#;
        let response = format!(
            r#"{{"themes": [{{"theme": "A", "items": [{i}, {i}, {i}, {i}]}}, {{"theme": "B", "items": [{i}, {i}]}}]}}"#,
            i = item
        );
        let curator = WeeklyCurator::new(Arc::new(DummyModel::new(response)));

        let result = curator.curate(&config(&dir), today()).await.unwrap();

        assert_eq!(result.item_count(), 5);
        assert_eq!(result.themes.len(), 2);
    }
}
