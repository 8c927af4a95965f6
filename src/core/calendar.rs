use crate::core::extractor::extract;
use crate::core::tokenizer::tokenize;
use crate::domain::model::HistoricalEvent;
use crate::utils::error::Result;
use std::path::Path;

/// Parse a whole calendar file. The first line is a header and is always
/// dropped. Blank lines and rows the extractor rejects are skipped.
pub fn load(source_text: &str) -> Vec<HistoricalEvent> {
    let mut events = Vec::new();

    for (index, line) in source_text.split('\n').enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match extract(&tokenize(trimmed)) {
            Some(event) => events.push(event),
            None => tracing::debug!("Skipping malformed calendar row {}: {:?}", index + 1, trimmed),
        }
    }

    events
}

/// Read and parse a calendar file. Any read failure is returned, never an
/// empty list, so "no file" and "no events" stay distinguishable.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<HistoricalEvent>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let events = load(&text);
    tracing::debug!(
        "Loaded {} events from {}",
        events.len(),
        path.as_ref().display()
    );
    Ok(events)
}
