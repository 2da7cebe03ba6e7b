//! Incoming webhook sender.
//!
//! A webhook URL is bound to one integration and answers in plain text, so
//! replies skip the response envelope entirely. Only encoding and transport
//! failures are reported.

use std::fmt;
use std::sync::Arc;

use crate::CoreError;
use crate::config::AppConfig;
use crate::error::Result;
use crate::slack::client::default_transport;
use crate::slack::models::OutgoingMessage;
use crate::slack::transport::{CallContext, HttpRequest, Transport};

/// Sender bound to one incoming webhook URL.
#[derive(Clone)]
pub struct WebHook {
    hook_url: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for WebHook {
    // The hook URL embeds its own secret.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHook")
            .field("hook_url", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl WebHook {
    /// Create a sender for `hook_url` over an existing transport.
    #[must_use]
    pub fn new(hook_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            hook_url: hook_url.into(),
            transport,
        }
    }

    /// Create a sender from `api.webhook_url`, using the `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if no webhook URL is configured or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let hook_url = config
            .api
            .webhook_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                CoreError::Config(
                    "no webhook URL configured (api.webhook_url or SLK_API__WEBHOOK_URL)"
                        .to_string(),
                )
            })?;
        Ok(Self::new(hook_url, default_transport(config)?))
    }

    /// Post `message` to the webhook.
    ///
    /// The reply body is logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if the message cannot be encoded,
    /// or [`CoreError::Transport`] if delivery fails.
    pub async fn post_message(&self, message: &OutgoingMessage, cx: &CallContext) -> Result<()> {
        let body = serde_json::to_vec(message)
            .map_err(|e| CoreError::Serialization(format!("encoding webhook payload: {e}")))?;

        log::debug!("POST webhook ({} bytes)", body.len());
        let request = HttpRequest::post_json(self.hook_url.as_str(), body).with_context(cx.clone());
        let reply = self.transport.send(request).await?;
        log::debug!("webhook replied: {}", String::from_utf8_lossy(&reply));

        Ok(())
    }
}
