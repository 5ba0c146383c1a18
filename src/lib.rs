pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::storage::LocalStorage;
pub use config::toml_config::ScrapeConfig;
pub use crate::core::{etl::EtlEngine, feeds::FeedType, pipeline::FeedPipeline};
pub use utils::error::{EtlError, Result};
