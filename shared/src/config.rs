//! Configuration management for the plans Lambda.

use chrono::FixedOffset;
use std::env;
use std::path::PathBuf;

use crate::{Error, Result};

const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
const DEFAULT_MAX_RESULTS: u32 = 5;
const DEFAULT_TIME_ZONE: &str = "Asia/Tokyo";
const DEFAULT_DISPLAY_OFFSET_HOURS: i32 = 9;
const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Where the Google service-account key is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    /// JSON key file on the local filesystem
    File(PathBuf),
    /// AWS Secrets Manager secret holding the JSON key
    Secret(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret expected in the `x-api-key` header
    pub api_key: String,
    /// Google Calendar identifier
    pub calendar_id: String,
    /// Service-account key location
    pub credentials: CredentialsSource,
    /// Maximum number of events requested from the calendar
    pub max_results: u32,
    /// Time-zone hint passed to the calendar API
    pub time_zone: String,
    /// Offset applied when rendering `displayTime`
    pub display_offset: FixedOffset,
    /// Calendar API base URL
    pub calendar_api_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{} not set", name)))
        };

        let credentials = match lookup("GOOGLE_CREDENTIALS_SECRET_ARN").filter(|v| !v.is_empty()) {
            Some(arn) => CredentialsSource::Secret(arn),
            None => CredentialsSource::File(PathBuf::from(
                lookup("GOOGLE_CREDENTIALS_PATH")
                    .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.to_string()),
            )),
        };

        let max_results = match lookup("CALENDAR_MAX_RESULTS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    Error::Config(format!("CALENDAR_MAX_RESULTS must be a positive integer, got {:?}", raw))
                })?,
            None => DEFAULT_MAX_RESULTS,
        };

        let offset_hours = match lookup("DISPLAY_UTC_OFFSET_HOURS") {
            Some(raw) => raw.parse::<i32>().map_err(|_| {
                Error::Config(format!("DISPLAY_UTC_OFFSET_HOURS must be an integer, got {:?}", raw))
            })?,
            None => DEFAULT_DISPLAY_OFFSET_HOURS,
        };
        let display_offset = offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::Config(format!("DISPLAY_UTC_OFFSET_HOURS out of range: {}", offset_hours))
            })?;

        Ok(Self {
            api_key: required("PLANS_API_KEY")?,
            calendar_id: required("CALENDAR_ID")?,
            credentials,
            max_results,
            time_zone: lookup("CALENDAR_TIME_ZONE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string()),
            display_offset,
            calendar_api_base: lookup("CALENDAR_API_BASE")
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
        })
    }
}
