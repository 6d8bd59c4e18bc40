//! Plans Lambda - Handles the getPlans endpoint.
//!
//! Returns the next week's events of one Google Calendar, sorted by start
//! time, to callers presenting the shared `x-api-key`.

use chrono::Local;
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::{handle_plans_request, Config, GoogleCalendarClient, ServiceAccountKey};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: Config,
    calendar: GoogleCalendarClient,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;

        info!(credentials = ?config.credentials, "Loading service account key");
        let key = ServiceAccountKey::load(&config.credentials).await?;

        let calendar = GoogleCalendarClient::new(
            reqwest::Client::new(),
            key,
            config.calendar_api_base.clone(),
        );

        Ok(Self { config, calendar })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    handle_plans_request(&event, &state.config, &state.calendar, &Local::now()).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
