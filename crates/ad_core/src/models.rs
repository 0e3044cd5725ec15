use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A single-turn, text-in/text-out generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub region: String,
    pub max_output_tokens: u32,
}

#[async_trait]
pub trait TextModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Returns the raw text of the model's single response.
    ///
    /// Transport and auth failures are returned as errors; callers decide
    /// how to report them.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
