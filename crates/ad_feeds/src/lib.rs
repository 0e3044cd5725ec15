pub mod fetchers;
pub mod cli;
pub mod logging;

pub use fetchers::{FeedFetcher, FeedKind, FetchOutcome, HOURS_LOOKBACK};

pub use cli::{SourcesArgs, SourcesCommands, handle_command};
pub use logging::{init_logging, Logger};

pub mod prelude {
    pub use super::fetchers::{FeedFetcher, FetchOutcome};
    pub use ad_core::{Article, Result, Error, SourceDescriptor};
}
