pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{FeedClient, LocalStorage};
pub use crate::core::{engine::SkywatchEngine, pipeline::AuroraPipeline};
pub use domain::model::{AuroraResult, GeoPoint, GridSample, SolarWindSnapshot};
pub use utils::error::{Result, SkywatchError};
