//! Two-phase decoding of Web API responses.
//!
//! Every read endpoint answers with `{"ok": bool, "error": "...", ...}`. The
//! header is decoded first; only a successful header releases the body for a
//! second, endpoint-specific decode. Error responses and success payloads have
//! unrelated shapes, so they are never folded into one schema.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::CoreError;
use crate::error::Result;

/// Maximum number of body bytes copied into a decode error.
pub const DIAGNOSTIC_BODY_LIMIT: usize = 256;

/// Common response header.
#[derive(Debug, Deserialize)]
struct Header {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// A response whose envelope reported success.
///
/// Holds the raw body until the caller decodes the endpoint shape.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    endpoint: &'static str,
    body: &'a [u8],
}

impl<'a> Payload<'a> {
    /// Raw response bytes.
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.body
    }

    /// Decode the endpoint-specific response shape.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Decode`] if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(self.body).map_err(|e| decode_error(self.endpoint, &e, self.body))
    }
}

/// Decode the envelope header of `body`.
///
/// # Errors
///
/// - [`CoreError::Decode`] if the body is not a valid envelope, including an
///   `ok: false` response that carries no error code.
/// - [`CoreError::Api`] with the remote error code if `ok` is false.
pub fn open<'a>(endpoint: &'static str, body: &'a [u8]) -> Result<Payload<'a>> {
    let header: Header =
        serde_json::from_slice(body).map_err(|e| decode_error(endpoint, &e, body))?;

    if header.ok {
        return Ok(Payload { endpoint, body });
    }

    match header.error {
        Some(code) => {
            log::warn!("{endpoint} returned error: {code}");
            Err(CoreError::Api(code))
        }
        None => Err(CoreError::Decode {
            endpoint,
            message: "envelope reported failure without an error code".to_string(),
            body: truncate_body(body),
        }),
    }
}

/// Open the envelope and decode the payload in one step.
///
/// # Errors
///
/// See [`open`] and [`Payload::decode`].
pub fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &[u8]) -> Result<T> {
    open(endpoint, body)?.decode()
}

fn decode_error(endpoint: &'static str, err: &serde_json::Error, body: &[u8]) -> CoreError {
    CoreError::Decode {
        endpoint,
        message: err.to_string(),
        body: truncate_body(body),
    }
}

/// Lossy UTF-8 rendering of at most [`DIAGNOSTIC_BODY_LIMIT`] bytes.
fn truncate_body(body: &[u8]) -> String {
    let end = body.len().min(DIAGNOSTIC_BODY_LIMIT);
    let mut text = String::from_utf8_lossy(&body[..end]).into_owned();
    if body.len() > DIAGNOSTIC_BODY_LIMIT {
        text.push_str("...");
    }
    text
}
