pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod types;

pub use config::{AppConfig, Settings};
pub use error::{Error, Result};
pub use models::{GenerationRequest, TextModel};
pub use types::{Article, DigestItem, SourceDescriptor, Theme, WeeklyItem, WeeklyResult};

pub mod prelude {
    pub use super::{AppConfig, Article, DigestItem, Error, Result, Settings, TextModel};
}
