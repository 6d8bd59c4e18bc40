//! Event normalization, ordering and display formatting.

use chrono::{DateTime, Days, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use tracing::warn;

use crate::models::{CalendarEvent, DisplayEvent, EventDateTime};
use crate::{Error, Result};

/// Offset of the sentinel instant, 1970-01-01T00:00:00+09:00.
const SENTINEL_OFFSET_HOURS: i64 = 9;

/// Number of calendar days covered by a plans query.
pub const WINDOW_DAYS: u64 = 7;

/// Instant substituted for missing, all-day or unparseable event times.
pub fn sentinel_instant() -> DateTime<Utc> {
    DateTime::<Utc>::default() - Duration::hours(SENTINEL_OFFSET_HOURS)
}

/// Resolve an event time to a concrete instant.
///
/// Only `dateTime` is considered. Anything else falls back to
/// [`sentinel_instant`], so this never fails.
pub fn normalize_event_time(time: Option<&EventDateTime>) -> DateTime<Utc> {
    let Some(raw) = time.and_then(|t| t.date_time.as_deref()) else {
        return sentinel_instant();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            warn!(date_time = raw, error = %e, "Unparseable event dateTime, using default time");
            sentinel_instant()
        }
    }
}

/// Event paired with its normalized start and end instants.
#[derive(Debug, Clone)]
pub struct NormalizedEvent {
    pub event: CalendarEvent,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<CalendarEvent> for NormalizedEvent {
    fn from(event: CalendarEvent) -> Self {
        let start = normalize_event_time(event.start.as_ref());
        let end = normalize_event_time(event.end.as_ref());
        Self { event, start, end }
    }
}

/// Order events ascending by start. Events with equal starts keep their
/// input order.
pub fn order_events(events: Vec<CalendarEvent>) -> Vec<NormalizedEvent> {
    let mut normalized: Vec<NormalizedEvent> = events.into_iter().map(NormalizedEvent::from).collect();
    // sort_by_key is stable
    normalized.sort_by_key(|e| e.start);
    normalized
}

/// Render `YYYY-MM-DD HH:MM - HH:MM` in the given offset.
pub fn format_display_time(start: DateTime<Utc>, end: DateTime<Utc>, offset: FixedOffset) -> String {
    format!(
        "{} - {}",
        start.with_timezone(&offset).format("%Y-%m-%d %H:%M"),
        end.with_timezone(&offset).format("%H:%M")
    )
}

/// Build the response entry for one ordered event.
pub fn to_display_event(normalized: NormalizedEvent, offset: FixedOffset) -> DisplayEvent {
    let display_time = format_display_time(normalized.start, normalized.end, offset);
    let NormalizedEvent { event, .. } = normalized;

    DisplayEvent {
        title: event.summary,
        start_time: event.start.and_then(|t| t.date_time),
        end_time: event.end.and_then(|t| t.date_time),
        display_time,
    }
}

/// Query range for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
}

/// Compute the window from the start of `now`'s local day to the start of
/// the local day [`WINDOW_DAYS`] later.
pub fn query_window<Tz: TimeZone>(now: &DateTime<Tz>) -> Result<QueryWindow> {
    let today = now.date_naive();
    let last = today
        .checked_add_days(Days::new(WINDOW_DAYS))
        .ok_or_else(|| Error::Internal(format!("Date out of range: {}", today)))?;

    Ok(QueryWindow {
        time_min: local_midnight(&now.timezone(), today)?,
        time_max: local_midnight(&now.timezone(), last)?,
    })
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::Internal(format!("Invalid midnight for {}", date)))?;

    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::Internal(format!("Local midnight does not exist on {}", date)))
}
