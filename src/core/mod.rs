pub mod calendar;
pub mod etl;
pub mod extractor;
pub mod matcher;
pub mod pipeline;
pub mod post;
pub mod tokenizer;

pub use crate::domain::model::{DailyDigest, HistoricalEvent, RunSummary};
pub use crate::domain::ports::{CalendarSource, ConfigProvider, Pipeline, Publisher};
pub use crate::utils::error::Result;
