pub mod engine;
pub mod fusion;
pub mod grid;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod signal;
pub mod stargazing;

pub use crate::domain::model::{AuroraReport, AuroraResult, RawFeeds};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
