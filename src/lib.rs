pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{BlueskyPublisher, ConsolePublisher, LocalCalendar};
pub use config::Settings;
pub use core::{etl::BotEngine, pipeline::DailyPipeline};
pub use domain::model::{HistoricalEvent, RunSummary};
pub use utils::error::{BotError, Result};
