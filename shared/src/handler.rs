//! Plans endpoint: authenticate, fetch the coming week's events, respond.

use chrono::{DateTime, TimeZone};
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::{error, info, info_span, warn, Instrument};

use crate::auth::check_api_key;
use crate::calendar::{EventQuery, EventSource};
use crate::http::json_response;
use crate::models::{EventList, PlansResponse};
use crate::plans::{order_events, query_window, to_display_event};
use crate::Config;

pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";
pub const ITEMS_UNDEFINED_MESSAGE: &str = "Retrieved items are undefined";

/// Serve one plans request.
///
/// `now` fixes the start of the query window. Every outcome, including
/// upstream failures, becomes a JSON response; only response construction
/// itself can fail.
pub async fn handle_plans_request<S, Tz>(
    request: &Request,
    config: &Config,
    source: &S,
    now: &DateTime<Tz>,
) -> Result<Response<Body>, lambda_http::Error>
where
    S: EventSource + ?Sized,
    Tz: TimeZone,
{
    let request_id = request
        .lambda_context_ref()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let span = info_span!("plans", %request_id);

    let window = query_window(now);
    async move {
        info!("Authenticating request");
        if let Err(reason) = check_api_key(request.headers(), &config.api_key) {
            warn!(%reason, "Authentication failed");
            return json_response(400, &PlansResponse::error(AUTH_FAILED_MESSAGE));
        }

        let window = match window {
            Ok(window) => window,
            Err(e) => {
                error!(error = %e, "Failed to compute query window");
                return json_response(500, &PlansResponse::error(e.to_string()));
            }
        };

        let query = EventQuery {
            calendar_id: config.calendar_id.clone(),
            time_min: window.time_min,
            time_max: window.time_max,
            max_results: config.max_results,
            time_zone: config.time_zone.clone(),
        };

        let (status, result) = match source.list_events(&query).await {
            Ok(EventList { items: None }) => {
                warn!("Calendar response has no items field");
                (500, PlansResponse::error(ITEMS_UNDEFINED_MESSAGE))
            }
            Ok(EventList { items: Some(items) }) => {
                let num_items = items.len();
                let display = order_events(items)
                    .into_iter()
                    .map(|event| to_display_event(event, config.display_offset))
                    .collect();
                (200, PlansResponse::success(display, num_items))
            }
            Err(e) => {
                error!(error = %e, "Failed to get calendar events");
                (500, PlansResponse::error(e.to_string()))
            }
        };

        info!(status, result = ?result, "Function result");
        json_response(status, &result)
    }
    .instrument(span)
    .await
}
