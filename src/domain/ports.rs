use crate::domain::model::{DailyDigest, HistoricalEvent};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Where the raw calendar text comes from.
pub trait CalendarSource: Send + Sync {
    fn read_calendar(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Sink for formatted posts. Each call submits one post.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn calendar_path(&self) -> &str;
    fn timezone(&self) -> &str;
    fn hashtag(&self) -> &str;
    fn max_graphemes(&self) -> usize;
    /// `None` means "now" at the moment the pipeline runs.
    fn reference_instant(&self) -> Option<DateTime<Utc>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<HistoricalEvent>>;
    async fn transform(&self, events: Vec<HistoricalEvent>) -> Result<DailyDigest>;
    async fn load(&self, digest: DailyDigest) -> Result<usize>;
}
