use std::fmt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use ad_core::config::BedrockSettings;
use ad_core::{Error, GenerationRequest, Result, TextModel};

/// Environment variable holding the Bedrock API key.
pub const API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConverseRequest<'a> {
    messages: Vec<Message<'a>>,
    inference_config: InferenceConfig,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<TextBlock<'a>>,
}

#[derive(Serialize)]
struct TextBlock<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceConfig {
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ConverseResponse {
    output: Output,
}

#[derive(Deserialize)]
struct Output {
    message: Option<OutputMessage>,
}

#[derive(Deserialize)]
struct OutputMessage {
    #[serde(default)]
    content: Vec<OutputBlock>,
}

#[derive(Deserialize)]
struct OutputBlock {
    text: Option<String>,
}

/// Bedrock Converse API over HTTPS with bearer-token auth.
pub struct BedrockModel {
    client: Client,
    api_key: String,
    endpoint: Option<String>,
}

impl fmt::Debug for BedrockModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BedrockModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl BedrockModel {
    pub fn new(api_key: Option<String>, endpoint: Option<String>) -> Result<Self> {
        let Some(api_key) = api_key.filter(|k| !k.is_empty()) else {
            return Err(Error::Inference(format!(
                "Bedrock API key is required (set {})",
                API_KEY_ENV
            )));
        };
        Ok(Self {
            client: Client::new(),
            api_key,
            endpoint,
        })
    }

    pub fn from_settings(settings: &BedrockSettings) -> Result<Self> {
        Self::new(std::env::var(API_KEY_ENV).ok(), settings.endpoint.clone())
    }

    fn converse_url(&self, region: &str, model_id: &str) -> String {
        let endpoint = match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", region),
        };
        let model_id: String = url::form_urlencoded::byte_serialize(model_id.as_bytes()).collect();
        format!("{}/model/{}/converse", endpoint, model_id)
    }
}

#[async_trait]
impl TextModel for BedrockModel {
    fn name(&self) -> &str {
        "Bedrock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = ConverseRequest {
            messages: vec![Message {
                role: "user",
                content: vec![TextBlock {
                    text: &request.prompt,
                }],
            }],
            inference_config: InferenceConfig {
                max_tokens: request.max_output_tokens,
            },
        };

        let url = self.converse_url(&request.region, &request.model_id);
        tracing::debug!("Invoking {} ({} prompt chars)", request.model_id, request.prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Bedrock returned {} for {}: {}",
                status, request.model_id, detail
            )));
        }

        let response = response.json::<ConverseResponse>().await?;
        response
            .output
            .message
            .and_then(|m| m.content.into_iter().find_map(|block| block.text))
            .ok_or_else(|| Error::Inference("Bedrock response contained no text".to_string()))
    }
}
