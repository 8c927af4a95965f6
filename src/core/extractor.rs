use crate::domain::model::HistoricalEvent;

/// Map tokenized fields to an event.
///
/// Two fields are date and description. With three or more, the first is the
/// date, the last is the year and everything between is rejoined with `,` as
/// the description. The rejoin is a heuristic for descriptions that carried
/// unquoted commas: it assumes the date and year themselves never contain one.
pub fn extract<S: AsRef<str>>(fields: &[S]) -> Option<HistoricalEvent> {
    if fields.len() < 2 {
        return None;
    }

    let date_key = fields[0].as_ref().trim();
    if date_key.is_empty() {
        return None;
    }

    if fields.len() == 2 {
        return Some(HistoricalEvent::new(
            date_key,
            fields[1].as_ref().trim(),
            None,
        ));
    }

    let last = fields.len() - 1;
    let year = Some(fields[last].as_ref().trim())
        .filter(|y| !y.is_empty())
        .map(str::to_string);
    let description = fields[1..last]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(",");

    Some(HistoricalEvent::new(date_key, description.trim(), year))
}
