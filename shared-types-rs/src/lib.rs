//! Shared data model for the ad insights services.
//!
//! - [`logs`]: pipeline log entries and the stage mapping used for prompt selection
//! - [`chains`]: failure chains, the unit a user drills into from the dashboard
//! - [`recommendations`]: the historical recommendation corpus used for reranking
//! - [`store`]: the read interface over chains and their logs, plus the fixture store

pub mod chains;
pub mod error;
pub mod logs;
pub mod recommendations;
pub mod store;

pub use chains::FailureChain;
pub use error::DataError;
pub use logs::{LogEntry, LogStage, LogStatus};
pub use recommendations::{HistoricalRecommendation, RecommendationCorpus};
pub use store::{FailureLogStore, FixtureLogStore};

pub type Result<T> = std::result::Result<T, DataError>;
