//! Core library for slk - a typed Slack Web API client.
//!
//! This crate provides:
//! - Typed endpoint functions over a pluggable HTTP transport
//! - Envelope decoding with verbatim remote error codes
//! - Wire models tolerant of schema drift
//! - Incoming webhook delivery
//! - Configuration loading and logging setup
//! - Common types and error handling

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod slack;

pub use config::{ApiConfig, AppConfig, LogLevel, LoggingConfig, RuntimeConfig};
pub use error::{CoreError, Result};
pub use logging::init_logging;
pub use paths::AppPaths;
pub use slack::{
    CallContext, Credential, Endpoint, OutgoingMessage, Presence, SlackClient, Transport,
    TransportError, User, UserGroup, WebHook,
};

/// Application name used for config directories and environment prefix.
pub const APP_NAME: &str = "slk";

/// Returns the environment variable prefix for this application.
#[must_use]
pub fn env_prefix() -> String {
    APP_NAME
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
