//! Posting digests to a Slack incoming webhook.

use std::env;
use std::fmt;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info};
use ad_core::config::SlackSettings;
use ad_core::{DigestItem, Error, Result, WeeklyResult};

pub mod message;

pub use message::{format_message, format_weekly_message};

pub const WEBHOOK_ENV: &str = "AI_DIGEST_SLACK_WEBHOOK";

/// Test mode only ever uses `test_webhook_url`. Otherwise the configured
/// webhook wins over the environment.
pub fn resolve_webhook(
    settings: &SlackSettings,
    test_mode: bool,
    env_webhook: Option<String>,
) -> Option<String> {
    let non_empty = |url: &Option<String>| url.clone().filter(|u| !u.trim().is_empty());

    if test_mode {
        return non_empty(&settings.test_webhook_url);
    }
    non_empty(&settings.webhook_url).or_else(|| non_empty(&env_webhook))
}

pub struct SlackPublisher {
    client: Client,
    webhook_url: String,
}

impl fmt::Debug for SlackPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackPublisher")
            .field("webhook_url", &"[REDACTED]")
            .finish()
    }
}

impl SlackPublisher {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url: webhook_url.into(),
        }
    }

    /// `None` when no webhook is configured for the requested mode.
    pub fn from_settings(settings: &SlackSettings, test_mode: bool) -> Option<Self> {
        resolve_webhook(settings, test_mode, env::var(WEBHOOK_ENV).ok()).map(Self::new)
    }

    pub async fn post_text(&self, text: &str) -> Result<()> {
        debug!("Posting {} chars to Slack", text.len());
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Publish(format!("Slack returned {}: {}", status, body)));
        }
        Ok(())
    }

    pub async fn post_daily(&self, items: &[DigestItem], date: NaiveDate) -> Result<()> {
        self.post_text(&format_message(items, date)).await?;
        info!("📨 Posted daily digest to Slack");
        Ok(())
    }

    pub async fn post_weekly(&self, result: &WeeklyResult, start: NaiveDate, end: NaiveDate) -> Result<()> {
        self.post_text(&format_weekly_message(result, start, end)).await?;
        info!("📨 Posted weekly digest to Slack");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    type Captured = Arc<Mutex<Vec<Value>>>;

    async fn capture(State(captured): State<Captured>, Json(body): Json<Value>) -> StatusCode {
        captured.lock().unwrap().push(body);
        StatusCode::OK
    }

    async fn serve() -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/hook", post(capture))
            .route("/gone", post(|| async { (StatusCode::NOT_FOUND, "no_service") }))
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), captured)
    }

    fn slack(webhook: Option<&str>, test_webhook: Option<&str>) -> SlackSettings {
        SlackSettings {
            webhook_url: webhook.map(String::from),
            test_webhook_url: test_webhook.map(String::from),
        }
    }

    #[test]
    fn test_resolve_webhook() {
        let env = Some("https://hooks.slack.com/env".to_string());

        assert_eq!(
            resolve_webhook(&slack(Some("https://hooks.slack.com/prod"), None), false, env.clone()).as_deref(),
            Some("https://hooks.slack.com/prod")
        );
        assert_eq!(
            resolve_webhook(&slack(None, None), false, env.clone()).as_deref(),
            Some("https://hooks.slack.com/env")
        );
        assert_eq!(
            resolve_webhook(&slack(Some(""), None), false, env.clone()).as_deref(),
            Some("https://hooks.slack.com/env")
        );
        assert_eq!(resolve_webhook(&slack(None, None), false, None), None);
    }

    #[test]
    fn test_resolve_webhook_test_mode_never_falls_back() {
        let env = Some("https://hooks.slack.com/env".to_string());
        let prod = slack(Some("https://hooks.slack.com/prod"), None);

        assert_eq!(resolve_webhook(&prod, true, env.clone()), None);
        assert_eq!(
            resolve_webhook(&slack(Some("https://hooks.slack.com/prod"), Some("https://hooks.slack.com/test")), true, env)
                .as_deref(),
            Some("https://hooks.slack.com/test")
        );
    }

    #[test]
    fn test_debug_redacts_webhook() {
        let publisher = SlackPublisher::new("https://hooks.slack.com/services/SECRET");
        assert!(!format!("{:?}", publisher).contains("SECRET"));
    }

    #[tokio::test]
    async fn test_post_daily_sends_text_payload() {
        let (base, captured) = serve().await;
        let publisher = SlackPublisher::new(format!("{}/hook", base));
        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        publisher.post_daily(&[], date).await.unwrap();

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(
            bodies[0],
            json!({ "text": "AI Digest — Oct 18, 2026\n\nNo relevant AI news found today." })
        );
    }

    #[tokio::test]
    async fn test_post_weekly_sends_text_payload() {
        let (base, captured) = serve().await;
        let publisher = SlackPublisher::new(format!("{}/hook", base));
        let start = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        publisher.post_weekly(&WeeklyResult::default(), start, end).await.unwrap();

        let bodies = captured.lock().unwrap();
        assert_eq!(bodies[0]["text"], "Weekly Best of AI — Oct 12-18, 2026\n\nNo notable items this week.");
    }

    #[tokio::test]
    async fn test_post_text_rejected() {
        let (base, _) = serve().await;
        let publisher = SlackPublisher::new(format!("{}/gone", base));

        let err = publisher.post_text("hello").await.unwrap_err();

        assert!(matches!(err, Error::Publish(_)));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_post_text_unreachable() {
        let publisher = SlackPublisher::new("http://127.0.0.1:1/hook");
        assert!(matches!(publisher.post_text("hello").await, Err(Error::Http(_))));
    }
}
