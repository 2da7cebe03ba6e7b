//! Error types for the core library.

use thiserror::Error;

use crate::slack::transport::TransportError;

/// Core library error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A configuration-related error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The transport adapter failed before a response body was available.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body did not match the envelope or payload schema.
    #[error("decode error on {endpoint}: {message} (body: {body})")]
    Decode {
        /// Endpoint whose response failed to decode.
        endpoint: &'static str,
        /// Parser message.
        message: String,
        /// Response body, truncated for diagnostics.
        body: String,
    },

    /// The remote service reported `ok: false`. Carries the error code verbatim.
    #[error("API error: {0}")]
    Api(String),

    /// A local search over decoded results matched nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// An outgoing payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Remote error code when this is an [`CoreError::Api`] error.
    #[must_use]
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api(code) => Some(code.as_str()),
            _ => None,
        }
    }
}
