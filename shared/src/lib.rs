//! Shared library for the plans Lambda.
//!
//! This crate holds the event pipeline, the Google Calendar client and the
//! request handler; the `api-gateway` binary only wires them to the runtime.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod models;
pub mod plans;
pub mod secrets;

pub use calendar::{GoogleCalendarClient, ServiceAccountKey};
pub use config::Config;
pub use error::{Error, Result};
pub use handler::handle_plans_request;
