//! Shared data models.

use serde::{Deserialize, Serialize};

/// Start or end time of a Google Calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    /// RFC 3339 timestamp for timed events
    #[serde(rename = "dateTime", default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    /// `YYYY-MM-DD` for all-day events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// Google Calendar event, reduced to the fields the plans endpoint reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

/// Body of an events.list response.
///
/// `items` stays `None` when the field is missing from the payload, which is
/// reported differently from an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Option<Vec<CalendarEvent>>,
}

/// One entry of the plans response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// `YYYY-MM-DD HH:MM - HH:MM`
    pub display_time: String,
}

/// JSON body returned by the plans endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PlansResponse {
    Success {
        num_items: usize,
        items: Vec<DisplayEvent>,
    },
    Error {
        message: String,
    },
}

impl PlansResponse {
    pub fn success(items: Vec<DisplayEvent>, num_items: usize) -> Self {
        Self::Success { num_items, items }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_items_differs_from_empty() {
        let missing: EventList = serde_json::from_str(r#"{"kind":"calendar#events"}"#).unwrap();
        assert!(missing.items.is_none());

        let empty: EventList = serde_json::from_str(r#"{"kind":"calendar#events","items":[]}"#).unwrap();
        assert_eq!(empty.items, Some(vec![]));
    }

    #[test]
    fn test_parse_google_event() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "id": "abc",
            "summary": "Dentist",
            "start": {"dateTime": "2024-03-05T09:30:00+09:00", "timeZone": "Asia/Tokyo"},
            "end": {"date": "2024-03-06"}
        }))
        .unwrap();

        assert_eq!(event.summary.as_deref(), Some("Dentist"));
        let start = event.start.unwrap();
        assert_eq!(start.date_time.as_deref(), Some("2024-03-05T09:30:00+09:00"));
        assert_eq!(start.time_zone.as_deref(), Some("Asia/Tokyo"));
        assert_eq!(event.end.unwrap().date.as_deref(), Some("2024-03-06"));
    }

    #[test]
    fn test_response_shapes() {
        let success = PlansResponse::success(
            vec![DisplayEvent {
                title: None,
                start_time: Some("2024-03-05T09:30:00+09:00".to_string()),
                end_time: None,
                display_time: "2024-03-05 09:30 - 09:00".to_string(),
            }],
            1,
        );
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({
                "status": "success",
                "num_items": 1,
                "items": [{
                    "startTime": "2024-03-05T09:30:00+09:00",
                    "displayTime": "2024-03-05 09:30 - 09:00"
                }]
            })
        );

        assert_eq!(
            serde_json::to_value(PlansResponse::error("Authentication failed")).unwrap(),
            json!({"status": "error", "message": "Authentication failed"})
        );
    }
}
