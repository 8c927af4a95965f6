use crate::domain::model::HistoricalEvent;
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_HASHTAG: &str = " #OnThisDay";
pub const DEFAULT_MAX_GRAPHEMES: usize = 300;

const ELLIPSIS: &str = "…";
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `MM-DD` to a short label such as `Jan 1`. `None` if the key is not a
/// month/day pair.
pub fn format_date(date_key: &str) -> Option<String> {
    let (mm, dd) = date_key.split_once('-')?;
    let month: usize = mm.trim().parse().ok()?;
    let day: u32 = dd.trim().parse().ok()?;

    if !(1..=31).contains(&day) {
        return None;
    }
    let name = MONTHS.get(month.checked_sub(1)?)?;
    Some(format!("{} {}", name, day))
}

fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

#[derive(Debug, Clone)]
pub struct PostFormatter {
    hashtag: String,
    max_graphemes: usize,
}

impl Default for PostFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_HASHTAG, DEFAULT_MAX_GRAPHEMES)
    }
}

impl PostFormatter {
    pub fn new(hashtag: impl Into<String>, max_graphemes: usize) -> Self {
        Self {
            hashtag: hashtag.into(),
            max_graphemes,
        }
    }

    /// Graphemes taken by everything except the description, including the
    /// ellipsis added on truncation.
    pub fn overhead(&self, event: &HistoricalEvent) -> usize {
        grapheme_len(&self.prefix(event)) + grapheme_len(&self.hashtag) + grapheme_len(ELLIPSIS)
    }

    fn prefix(&self, event: &HistoricalEvent) -> String {
        let label = format_date(&event.date_key).unwrap_or_else(|| event.date_key.clone());
        match &event.year {
            Some(year) => format!("{}, {}: ", label, year),
            None => format!("{}: ", label),
        }
    }

    /// Render one post. Over-long descriptions are cut on grapheme
    /// boundaries and marked with `…` so the whole post fits the budget.
    pub fn format(&self, event: &HistoricalEvent) -> String {
        let prefix = self.prefix(event);
        let text = format!("{}{}{}", prefix, event.description, self.hashtag);

        if grapheme_len(&text) <= self.max_graphemes {
            return text;
        }

        let available = self.max_graphemes.saturating_sub(self.overhead(event));
        let truncated: String = event.description.graphemes(true).take(available).collect();
        tracing::warn!(
            "Post for {} truncated to fit {} graphemes",
            event.date_key,
            self.max_graphemes
        );
        format!("{}{}{}{}", prefix, truncated, ELLIPSIS, self.hashtag)
    }
}
