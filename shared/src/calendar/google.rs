//! Google Calendar v3 events.list client.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use tracing::{info, warn};

use super::{EventQuery, EventSource, ServiceAccountKey, CALENDAR_EVENTS_READONLY_SCOPE};
use crate::models::EventList;
use crate::{Error, Result};

/// Error body returned by Google APIs.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

/// Pull `error.message` out of a Google error body, if it has that shape.
fn google_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GoogleErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
}

/// Calendar client authenticated as a service account.
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    key: ServiceAccountKey,
    api_base: String,
}

impl GoogleCalendarClient {
    pub fn new(http_client: reqwest::Client, key: ServiceAccountKey, api_base: impl Into<String>) -> Self {
        Self {
            http_client,
            key,
            api_base: api_base.into(),
        }
    }
}

#[async_trait]
impl EventSource for GoogleCalendarClient {
    async fn list_events(&self, query: &EventQuery) -> Result<EventList> {
        let access_token = self
            .key
            .access_token(&self.http_client, CALENDAR_EVENTS_READONLY_SCOPE)
            .await?;

        let url = format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&query.calendar_id)
        );
        let time_min = query.time_min.to_rfc3339_opts(SecondsFormat::Millis, true);
        let time_max = query.time_max.to_rfc3339_opts(SecondsFormat::Millis, true);
        info!(%time_min, %time_max, max_results = query.max_results, "Requesting calendar events");

        let params = [
            ("timeMin", time_min),
            ("timeMax", time_max),
            ("maxResults", query.max_results.to_string()),
            ("timeZone", query.time_zone.clone()),
        ];

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&access_token)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!(%status, "Calendar API returned an error");
            return Err(Error::Calendar(
                google_error_message(&error_text).unwrap_or(error_text),
            ));
        }

        Ok(response.json::<EventList>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRIVATE_KEY: &str = include_str!("../../testdata/service_account_key.pem");

    async fn client_for(server: &MockServer) -> GoogleCalendarClient {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "ya29.test-token",
                "expires_in": 3599,
                "token_type": "Bearer"
            })))
            .mount(server)
            .await;

        let key = ServiceAccountKey::from_json(
            &json!({
                "private_key": PRIVATE_KEY,
                "client_email": "plans@plans-test.iam.gserviceaccount.com",
                "token_uri": format!("{}/token", server.uri()),
            })
            .to_string(),
        )
        .unwrap();

        GoogleCalendarClient::new(reqwest::Client::new(), key, server.uri())
    }

    fn query(calendar_id: &str) -> EventQuery {
        let parse = |s: &str| DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc);
        EventQuery {
            calendar_id: calendar_id.to_string(),
            time_min: parse("2024-03-04T15:00:00Z"),
            time_max: parse("2024-03-11T15:00:00Z"),
            max_results: 5,
            time_zone: "Asia/Tokyo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_events_sends_query() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/calendars/family%40example.com/events"))
            .and(header("authorization", "Bearer ya29.test-token"))
            .and(query_param("timeMin", "2024-03-04T15:00:00.000Z"))
            .and(query_param("timeMax", "2024-03-11T15:00:00.000Z"))
            .and(query_param("maxResults", "5"))
            .and(query_param("timeZone", "Asia/Tokyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "calendar#events",
                "items": [
                    {"summary": "Swim", "start": {"dateTime": "2024-03-06T18:00:00+09:00"}},
                    {"summary": "Holiday", "start": {"date": "2024-03-08"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = client.list_events(&query("family@example.com")).await.unwrap();
        let items = list.items.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].summary.as_deref(), Some("Swim"));
    }

    #[tokio::test]
    async fn test_list_events_without_items() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"kind": "calendar#events"})))
            .mount(&server)
            .await;

        let list = client.list_events(&query("primary")).await.unwrap();
        assert!(list.items.is_none());
    }

    #[tokio::test]
    async fn test_list_events_google_error() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": {
                    "code": 403,
                    "message": "Quota exceeded for quota metric 'Queries'",
                    "errors": [{"reason": "rateLimitExceeded"}]
                }
            })))
            .mount(&server)
            .await;

        let err = client.list_events(&query("primary")).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Calendar API error: Quota exceeded for quota metric 'Queries'"
        );
    }

    #[tokio::test]
    async fn test_list_events_plain_error_body() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = client.list_events(&query("primary")).await.unwrap_err();
        assert!(matches!(err, Error::Calendar(ref m) if m == "upstream unavailable"));
    }
}
