use crate::core::CalendarSource;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Calendar file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalCalendar {
    path: PathBuf,
}

impl LocalCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CalendarSource for LocalCalendar {
    async fn read_calendar(&self) -> Result<String> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        tracing::debug!("Read {} bytes from {}", text.len(), self.path.display());
        Ok(text)
    }
}
