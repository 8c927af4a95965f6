use crate::domain::model::HistoricalEvent;
use crate::utils::error::{BotError, Result};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt;

/// `MM-DD` for `instant` as seen on a wall clock in `tz`.
pub fn today_key<Z>(tz: &Z, instant: DateTime<Utc>) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    instant.with_timezone(tz).format("%m-%d").to_string()
}

/// Events whose date key is today's key in `tz`, in their original order.
///
/// `02-29` needs no special handling: outside leap years no instant resolves
/// to it, so those events simply never match.
pub fn match_today<Z>(
    events: &[HistoricalEvent],
    tz: &Z,
    reference: Option<DateTime<Utc>>,
) -> Vec<HistoricalEvent>
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    let key = today_key(tz, reference.unwrap_or_else(Utc::now));
    events
        .iter()
        .filter(|event| event.date_key == key)
        .cloned()
        .collect()
}

/// Resolve an IANA timezone name such as `UTC` or `America/New_York`.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| BotError::InvalidConfigValueError {
            field: "timezone".to_string(),
            value: name.to_string(),
            reason: e.to_string(),
        })
}
