//! Calendar collaborator used by the plans handler.

pub mod credentials;
pub mod google;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::EventList;
use crate::Result;

pub use credentials::ServiceAccountKey;
pub use google::GoogleCalendarClient;

/// Read-only scope requested for the service account.
pub const CALENDAR_EVENTS_READONLY_SCOPE: &str =
    "https://www.googleapis.com/auth/calendar.events.readonly";

/// Parameters of one events.list call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: u32,
    pub time_zone: String,
}

/// Source of upcoming calendar events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// List events in `query.calendar_id` between `time_min` and `time_max`.
    async fn list_events(&self, query: &EventQuery) -> Result<EventList>;
}
