use serde::{Deserialize, Serialize};

/// One calendar row after extraction. Never built with an empty `date_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// `MM-DD`, year independent.
    pub date_key: String,
    pub description: String,
    pub year: Option<String>,
}

impl HistoricalEvent {
    pub fn new(
        date_key: impl Into<String>,
        description: impl Into<String>,
        year: Option<String>,
    ) -> Self {
        Self {
            date_key: date_key.into(),
            description: description.into(),
            year,
        }
    }
}

/// Output of the transform phase: today's events and the text to post for each.
#[derive(Debug, Clone)]
pub struct DailyDigest {
    pub today_key: String,
    pub matched: Vec<HistoricalEvent>,
    pub posts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub today_key: String,
    pub loaded: usize,
    pub matched: usize,
    pub published: usize,
}
