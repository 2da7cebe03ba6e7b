//! Transport adapter seam between endpoint functions and the network.
//!
//! Endpoint functions describe a call as an [`HttpRequest`] and hand it to a
//! [`Transport`]. The adapter owns everything below that line: connection
//! handling, TLS, timeouts. Callers that want their own HTTP stack implement
//! the trait; [`ReqwestTransport`] is the default.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Content type set on JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Query parameters whose values never appear in debug output.
const REDACTED_PARAMS: &[&str] = &["token"];

/// Failure reported by a transport adapter.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Numeric HTTP status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },

    /// The call's deadline passed before a response arrived.
    #[error("deadline exceeded")]
    Timeout,

    /// The call's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
}

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read endpoints.
    Get,
    /// Webhook delivery.
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Per-call cancellation and deadline.
///
/// Passed explicitly into every endpoint call and carried on the
/// [`HttpRequest`], so a single client can serve unrelated call scopes.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl CallContext {
    /// A context with no deadline and no cancellation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an absolute deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The cancellation token, if any.
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    /// Drive `exchange` under this context's deadline and cancellation.
    ///
    /// Adapters wrap their network round trip in this so that both limits
    /// behave the same regardless of the HTTP library underneath.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Timeout`] when the deadline passes,
    /// [`TransportError::Cancelled`] when the token fires, or whatever
    /// `exchange` itself returns.
    pub async fn run<T, F>(&self, exchange: F) -> Result<T, TransportError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        let bounded = async {
            match self.deadline {
                Some(deadline) => {
                    let deadline = tokio::time::Instant::from_std(deadline);
                    match tokio::time::timeout_at(deadline, exchange).await {
                        Ok(result) => result,
                        Err(_elapsed) => Err(TransportError::Timeout),
                    }
                }
                None => exchange.await,
            }
        };

        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    () = token.cancelled() => Err(TransportError::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        }
    }
}

/// A single outbound HTTP call.
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, URL-encoded by the adapter.
    pub query: Vec<(&'static str, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Content type of `body`.
    pub content_type: Option<&'static str>,
    /// Cancellation and deadline for this call.
    pub context: CallContext,
}

impl HttpRequest {
    /// A GET request with query parameters.
    #[must_use]
    pub fn get(url: impl Into<String>, query: Vec<(&'static str, String)>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            query,
            body: None,
            content_type: None,
            context: CallContext::default(),
        }
    }

    /// A POST request carrying a JSON body.
    #[must_use]
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            query: Vec::new(),
            body: Some(body),
            content_type: Some(JSON_CONTENT_TYPE),
            context: CallContext::default(),
        }
    }

    /// Attach the caller's cancellation and deadline.
    #[must_use]
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = context;
        self
    }

    /// Value of the first query parameter named `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let query: Vec<(&str, &str)> = self
            .query
            .iter()
            .map(|(key, value)| {
                if REDACTED_PARAMS.contains(key) {
                    (*key, "<redacted>")
                } else {
                    (*key, value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("query", &query)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("content_type", &self.content_type)
            .field("context", &self.context)
            .finish()
    }
}

/// Capability that performs one HTTP round trip.
///
/// Implementations must be safe for concurrent use; the client shares one
/// adapter across every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] for connection failures, non-success
    /// statuses, deadline expiry, or cancellation.
    async fn send(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with an overall request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.to_string())
            .build()
            .map_err(|e| TransportError::Request(format!("creating HTTP client: {e}")))?;
        Ok(Self::from_client(http_client))
    }

    /// Wrap an already configured `reqwest` client.
    #[must_use]
    pub const fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Vec<u8>, TransportError> {
        let HttpRequest {
            method,
            url,
            query,
            body,
            content_type,
            context,
        } = request;

        let mut builder = match method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
        };
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(content_type) = content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        context
            .run(async {
                let response = builder
                    .send()
                    .await
                    .map_err(|e| TransportError::Request(e.to_string()))?;

                if !response.status().is_success() {
                    let status = response.status().as_u16();
                    let body = response.text().await.unwrap_or_else(|e| {
                        log::debug!("reading {status} response body failed: {e}");
                        String::new()
                    });
                    return Err(TransportError::Status { status, body });
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| TransportError::Request(format!("reading body: {e}")))?;
                Ok(bytes.to_vec())
            })
            .await
    }
}
