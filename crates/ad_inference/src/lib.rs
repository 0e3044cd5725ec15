pub mod models;
pub mod response;
pub mod summarizer;
pub mod weekly;

pub use models::{create_model, BedrockModel, DummyModel, AVAILABLE_MODELS};
pub use response::ResponseOutcome;
pub use summarizer::DailySummarizer;
pub use weekly::{load_week, window_start, WeeklyCurator};

pub mod prelude {
    pub use super::models::create_model;
    pub use super::{DailySummarizer, WeeklyCurator};
    pub use ad_core::{Article, DigestItem, Error, Result, WeeklyResult};
}
