//! Slack Web API client module.
//!
//! This module provides:
//! - A transport seam with a `reqwest` default
//! - Envelope decoding shared by every read endpoint
//! - Typed endpoint functions and the incoming webhook sender
//! - Wire models and list helpers

pub mod client;
pub mod collections;
pub mod envelope;
pub mod models;
pub mod transport;
pub mod webhook;

pub use client::{Credential, DEFAULT_BASE_URL, Endpoint, SlackClient};
pub use collections::{SortName, find_first, sort_by_name, take_first};
pub use models::{
    Attachment, Loose, OutgoingMessage, Prefs, Presence, Profile, User, UserGroup,
};
pub use transport::{CallContext, HttpRequest, Method, ReqwestTransport, Transport, TransportError};
pub use webhook::WebHook;
