use std::sync::Arc;
use ad_core::{Error, Result, Settings, TextModel};

pub mod bedrock;
pub mod dummy;

pub use bedrock::BedrockModel;
pub use dummy::DummyModel;

pub const AVAILABLE_MODELS: &[&str] = &["bedrock", "dummy"];

/// Builds the model named on the command line.
pub fn create_model(name: &str, settings: &Settings) -> Result<Arc<dyn TextModel>> {
    match name {
        "bedrock" => Ok(Arc::new(BedrockModel::from_settings(&settings.bedrock)?)),
        // The empty array degrades both stages to an empty result.
        "dummy" => Ok(Arc::new(DummyModel::new("[]"))),
        _ => Err(Error::Config(format!(
            "Unknown model: {}. Available models: {}",
            name,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}
